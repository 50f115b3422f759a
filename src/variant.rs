use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::game_state::GameStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Scoreless, solid walls, render loop always running.
    Classic,
    /// Scored, selectable walls, waits for the first move.
    Arcade,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStyle {
    /// Simulation steps are gated behind a render loop that never stops.
    FrameGated,
    /// Simulation steps come straight off a fixed timer; frames follow them.
    FixedTimer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub food_reward: u32,
    pub shows_score: bool,
    pub initial_status: GameStatus,
    pub wall_mode_selectable: bool,
    pub tick_style: TickStyle,
}

impl Variant {
    pub fn rules(self) -> Rules {
        match self {
            Variant::Classic => Rules {
                food_reward: 0,
                shows_score: false,
                initial_status: GameStatus::Running,
                wall_mode_selectable: false,
                tick_style: TickStyle::FrameGated,
            },
            Variant::Arcade => Rules {
                food_reward: 5,
                shows_score: true,
                initial_status: GameStatus::Idle,
                wall_mode_selectable: true,
                tick_style: TickStyle::FixedTimer,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Arcade => "Arcade",
        }
    }
}
