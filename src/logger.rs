use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, OnceLock};
use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Writes to a file, never to stdout: the terminal belongs to the game screen.
pub struct Logger {
    sink: Option<Mutex<File>>,
}

impl Logger {
    fn new(sink: Option<File>) -> Self {
        Self { sink: sink.map(Mutex::new) }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let Some(sink) = &self.sink else {
            return;
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        if let Ok(mut out) = sink.lock() {
            let _ = writeln!(out, "[{}][{}:{}] {}", timestamp, file_name, line, message);
        }
    }
}

/// With no path every `log!` call is a no-op.
pub fn init_logger(path: Option<&str>) -> Result<(), String> {
    let sink = match path {
        Some(path) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("Failed to open log file {}: {}", path, e))?,
        ),
        None => None,
    };
    LOGGER.get_or_init(|| Logger::new(sink));
    Ok(())
}

pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_lines_land_in_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("grid_snake_log_{}.log", rand::random::<u32>()));
        let path = path.to_str().unwrap().to_string();

        init_logger(Some(&path)).unwrap();
        crate::log!("hello {}", 42);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello 42"));
        assert!(content.contains("logger.rs:"));
        let _ = std::fs::remove_file(&path);
    }
}
