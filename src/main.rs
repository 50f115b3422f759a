mod config;
mod game;
mod game_state;
mod grid;
mod input;
mod logger;
mod snake;
mod term;
mod tick;
mod variant;

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::{Config, ConfigFile};
use grid::WallMode;
use variant::Variant;

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "grid_snake", about = "Snake on a fixed grid, in the terminal")]
struct Args {
    /// Rule set to play
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// YAML config file; defaults to grid_snake.yaml next to the executable
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    wall_mode: Option<WallMode>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    log_file: Option<String>,

    /// Write the default config to the config path and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_file = args.config.map(ConfigFile::new).unwrap_or_else(ConfigFile::default_location);

    if args.write_default_config {
        config_file.save(&Config::default())?;
        println!("Default config written to {}", config_file.path().display());
        return Ok(());
    }

    let mut config = config_file.load()?;
    if let Some(variant) = args.variant {
        config.variant = variant;
    }
    if let Some(wall_mode) = args.wall_mode {
        config.wall_mode = wall_mode;
    }
    if args.log_file.is_some() {
        config.log_file = args.log_file;
    }

    logger::init_logger(config.log_file.as_deref())?;
    log!("Config loaded from {}: {:?}", config_file.path().display(), config);

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // The game loop restores the terminal itself, also when it bails out early
    let mut game = game::SnakeGame::new(&config, rng)?;
    game.run()?;

    Ok(())
}
