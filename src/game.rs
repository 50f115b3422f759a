use std::{thread::sleep, time::{Duration, Instant}};

use crate::{Coords, TermInt};
use crate::config::Config;
use crate::game_state::{GameState, GameStatus, Outcome, Snapshot};
use crate::grid::Cell;
use crate::input::{command_for_key, Command};
use crate::log;
use crate::term::{Glyph, TermEvent, TermManager};
use crate::tick::TickDriver;

use crossterm::style::Color;
use rand::rngs::StdRng;

const POLL_INTERVAL_MS: u64 = 5;
const CELL_WIDTH: TermInt = 2;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHARS: [char; 2] = ['(', ')'];
const DEAD_SNAKE_CHAR: char = 'X';

/// Terminal front end: feeds key commands into the game state, runs the tick
/// driver and draws snapshots.
pub struct SnakeGame {
    term: TermManager,
    state: GameState,
    driver: TickDriver,
    overlay: Option<Vec<String>>,
    dirty: bool,
    too_small: bool,
}

impl SnakeGame {
    pub fn new(config: &Config, rng: StdRng) -> crossterm::Result<Self> {
        let state = GameState::new(config.variant, config.grid, config.wall_mode, rng);
        let driver = TickDriver::new(config.variant.rules().tick_style, config.step_period(), config.frame_period());
        log!("Tick driver: {:?}", driver);

        Ok(SnakeGame {
            term: TermManager::new()?,
            state,
            driver,
            overlay: None,
            dirty: true,
            too_small: false,
        })
    }

    /// Runs until the player quits. The terminal is restored on every exit path.
    pub fn run(&mut self) -> crossterm::Result<()> {
        self.term.setup()?;
        self.redraw_all()?;

        let mut last = Instant::now();

        'game: loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for ev in self.term.read_events_queue()? {
                match ev {
                    TermEvent::Resized => self.redraw_all()?,
                    TermEvent::Key(key) => match command_for_key(&key) {
                        Some(Command::Quit) => break 'game,
                        Some(cmd) => self.apply(cmd),
                        None => {}
                    },
                }
            }

            let now = Instant::now();
            let beat = self.driver.poll(now - last, self.state.status() == GameStatus::Running);
            last = now;

            if beat.step {
                self.state.tick();
            }

            if beat.render || beat.step || self.dirty {
                self.render()?;
                self.dirty = false;
            }
        }

        log!("Quit requested");
        self.term.restore()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::Turn(dir) => {
                self.state.request_direction(dir);
            }
            Command::TogglePause => self.state.toggle_running(),
            Command::Restart => self.state.restart(),
            Command::SetWallMode(mode) => {
                self.state.set_wall_mode(mode);
            }
            Command::CycleWallMode => {
                let mode = self.state.wall_mode().toggled();
                self.state.set_wall_mode(mode);
            }
            Command::Quit => {}
        }
        self.dirty = true;
    }

    fn redraw_all(&mut self) -> crossterm::Result<()> {
        self.term.clear()?;
        self.overlay = None;
        self.too_small = false;

        let snap = self.state.snapshot();
        if self.fits(&snap) {
            self.term.draw_borders((0, 0), board_size(&snap));
        }
        self.render()
    }

    fn fits(&self, snap: &Snapshot) -> bool {
        let (need_w, need_h) = board_size(snap);
        let (w, h) = self.term.get_terminal_size();
        w >= need_w && h > need_h
    }

    fn render(&mut self) -> crossterm::Result<()> {
        let snap = self.state.snapshot();

        if !self.fits(&snap) {
            // No room for the board: skip the frame, the state is untouched
            if !self.too_small {
                self.term.clear()?;
                let (w, h) = board_size(&snap);
                self.term.print_str_at((0, 0), &format!("Terminal too small, need {}x{}", w, h + 1), Color::Red);
                self.term.flush()?;
                self.too_small = true;
                self.overlay = None;
            }
            return Ok(());
        }
        if self.too_small {
            return self.redraw_all();
        }

        self.draw_cells(&snap);
        self.draw_status_line(&snap);
        self.update_overlay(&snap);
        self.term.flush()
    }

    fn draw_cells(&mut self, snap: &Snapshot) {
        let dead = snap.outcome.map_or(false, |o| matches!(o, Outcome::Crashed(_)));
        let width = snap.grid.width as usize;
        let mut cells = vec![[Glyph::BLANK; 2]; snap.grid.area()];

        if let Some(food) = snap.food {
            cells[food.y as usize * width + food.x as usize] = APPLE_CHARS.map(|ch| Glyph::new(ch, Color::Red));
        }

        for (i, pos) in snap.snake.iter().enumerate() {
            let glyph = if dead {
                Glyph::new(DEAD_SNAKE_CHAR, Color::DarkRed)
            } else if i == 0 {
                Glyph::new(snap.direction.head_char(), Color::Yellow)
            } else {
                Glyph::new(SNAKE_BODY_CHAR, Color::Green)
            };
            cells[pos.y as usize * width + pos.x as usize] = [glyph; 2];
        }

        for cell in snap.grid.cells() {
            let (x, y) = cell_origin(cell);
            let pair = cells[cell.y as usize * width + cell.x as usize];
            self.term.print_at((x, y), pair[0]);
            self.term.print_at((x + 1, y), pair[1]);
        }
    }

    fn draw_status_line(&mut self, snap: &Snapshot) {
        let mut line = snap.variant.label().to_string();
        if snap.shows_score {
            line.push_str(&format!("  Score: {}", snap.score));
        } else {
            line.push_str(&format!("  Length: {}", snap.snake.len()));
        }
        if snap.wall_mode_selectable {
            line.push_str(&format!("  Walls: {}  [1/2/m] walls", snap.wall_mode.label()));
        }
        line.push_str("  [p] pause  [r] restart  [q] quit");

        let (term_w, _) = self.term.get_terminal_size();
        let line = format!("{:<width$}", line, width = term_w as usize);
        let (_, board_h) = board_size(snap);
        self.term.print_str_at((0, board_h), &line, Color::Grey);
    }

    fn update_overlay(&mut self, snap: &Snapshot) {
        let wanted = overlay_lines(snap);
        if wanted == self.overlay {
            return;
        }

        match &wanted {
            Some(lines) => {
                let (w, h) = board_size(snap);
                self.term.show_message(lines.as_slice(), (w / 2, h / 2));
            }
            None => self.term.hide_message(),
        }
        self.overlay = wanted;
    }
}

/// Board footprint including the border, in terminal cells.
fn board_size(snap: &Snapshot) -> Coords {
    (snap.grid.width as TermInt * CELL_WIDTH + 2, snap.grid.height as TermInt + 2)
}

fn cell_origin(cell: Cell) -> Coords {
    (1 + cell.x as TermInt * CELL_WIDTH, 1 + cell.y as TermInt)
}

fn overlay_lines(snap: &Snapshot) -> Option<Vec<String>> {
    let lines = match snap.status {
        GameStatus::Running => return None,
        GameStatus::Idle => vec!["Press arrow keys or WASD".to_string(), "to start".to_string()],
        GameStatus::Paused => vec!["Paused".to_string(), "Esc, Space or P to resume".to_string()],
        GameStatus::GameOver => {
            let title = if snap.outcome == Some(Outcome::Won) {"You won!"} else {"Game over!"};
            let result = if snap.shows_score {
                format!("Score: {}", snap.score)
            } else {
                format!("Length: {}", snap.snake.len())
            };
            vec![
                title.to_string(),
                result,
                String::new(),
                "Press R to play again,".to_string(),
                "or Q to quit.".to_string(),
            ]
        }
    };
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridSize, WallMode};
    use crate::variant::Variant;
    use rand::SeedableRng;

    fn snapshot(variant: Variant) -> Snapshot {
        GameState::new(variant, GridSize::new(20, 20), WallMode::Solid, StdRng::seed_from_u64(3)).snapshot()
    }

    #[test]
    fn test_board_layout() {
        let snap = snapshot(Variant::Classic);
        assert_eq!(board_size(&snap), (42, 22));
        assert_eq!(cell_origin(Cell::new(0, 0)), (1, 1));
        assert_eq!(cell_origin(Cell::new(19, 19)), (39, 20));
    }

    #[test]
    fn test_overlays_follow_status() {
        assert_eq!(overlay_lines(&snapshot(Variant::Classic)), None);

        let idle = overlay_lines(&snapshot(Variant::Arcade)).unwrap();
        assert!(idle[0].contains("WASD"));

        let mut over = snapshot(Variant::Arcade);
        over.status = GameStatus::GameOver;
        over.outcome = Some(Outcome::Won);
        over.score = 35;
        let lines = overlay_lines(&over).unwrap();
        assert_eq!(lines[0], "You won!");
        assert_eq!(lines[1], "Score: 35");
    }

    #[test]
    fn test_classic_game_over_shows_length() {
        let mut over = snapshot(Variant::Classic);
        over.status = GameStatus::GameOver;
        over.outcome = Some(Outcome::Crashed(crate::snake::Collision::Wall));
        let lines = overlay_lines(&over).unwrap();
        assert_eq!(lines[0], "Game over!");
        assert_eq!(lines[1], "Length: 1");
    }
}
