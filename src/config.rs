use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grid::{GridSize, WallMode};
use crate::variant::Variant;

const CONFIG_FILE_NAME: &str = "grid_snake.yaml";

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ClassicConfig {
    pub speed_hz: u32,
    pub frame_rate_hz: u32,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ArcadeConfig {
    pub tick_interval_ms: u64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub variant: Variant,
    pub grid: GridSize,
    pub wall_mode: WallMode,
    pub classic: ClassicConfig,
    pub arcade: ArcadeConfig,
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Config {
    pub fn step_period(&self) -> Duration {
        match self.variant {
            Variant::Classic => Duration::from_secs(1) / self.classic.speed_hz,
            Variant::Arcade => Duration::from_millis(self.arcade.tick_interval_ms),
        }
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.classic.frame_rate_hz
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::Arcade,
            grid: GridSize::new(20, 20),
            wall_mode: WallMode::Solid,
            classic: ClassicConfig { speed_hz: 8, frame_rate_hz: 60 },
            arcade: ArcadeConfig { tick_interval_ms: 150 },
            log_file: None,
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        if !(5..=100).contains(&self.grid.width) {
            return Err("Grid width must be between 5 and 100".to_string());
        }
        if !(5..=100).contains(&self.grid.height) {
            return Err("Grid height must be between 5 and 100".to_string());
        }
        if !(1..=60).contains(&self.classic.speed_hz) {
            return Err("Classic speed must be between 1 and 60 Hz".to_string());
        }
        if !(10..=240).contains(&self.classic.frame_rate_hz) {
            return Err("Classic frame rate must be between 10 and 240 Hz".to_string());
        }
        if !(30..=2000).contains(&self.arcade.tick_interval_ms) {
            return Err("Arcade tick interval must be between 30ms and 2000ms".to_string());
        }
        Ok(())
    }
}

/// YAML config stored on disk. A missing file means defaults.
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Next to the executable, falling back to the working directory.
    pub fn default_location() -> Self {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                return Self::new(exe_dir.join(CONFIG_FILE_NAME));
            }
        }
        Self::new(CONFIG_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, String> {
        if !self.path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read config file {}: {}", self.path.display(), e))?;
        let config = deserialize(&content)?;

        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let content = serialize(config)?;
        std::fs::write(&self.path, content)
            .map_err(|e| format!("Failed to write config file {}: {}", self.path.display(), e))
    }
}

pub fn serialize(config: &Config) -> Result<String, String> {
    serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))
}

pub fn deserialize(content: &str) -> Result<Config, String> {
    serde_yaml_ng::from_str(content).map_err(|e| format!("Failed to deserialize config: {}", e))
}
