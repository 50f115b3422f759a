use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::grid::WallMode;
use crate::snake::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Restart,
    SetWallMode(WallMode),
    CycleWallMode,
    Quit,
}

/// Arrow keys and WASD, case-insensitive.
pub fn direction_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        },
        _ => None,
    }
}

pub fn command_for_key(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    if let Some(dir) = direction_for_key(ev.code) {
        return Some(Command::Turn(dir));
    }

    match ev.code {
        KeyCode::Esc | KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'p' => Some(Command::TogglePause),
            'r' => Some(Command::Restart),
            '1' => Some(Command::SetWallMode(WallMode::Solid)),
            '2' => Some(Command::SetWallMode(WallMode::Passthrough)),
            'm' => Some(Command::CycleWallMode),
            'q' => Some(Command::Quit),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
