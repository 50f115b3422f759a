use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::grid::{Cell, GridSize, WallMode};
use crate::log;
use crate::snake::{Collision, Direction, MoveResult, Snake};
use crate::variant::{Rules, Variant};

const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Crashed(Collision),
    /// No free cell was left for the next food.
    Won,
}

/// What a call to [`GameState::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Skipped,
    Moved,
    Ate,
    Ended(Outcome),
}

/// Read-only view handed to the presenter.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub variant: Variant,
    pub grid: GridSize,
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Option<Cell>,
    pub score: u32,
    pub shows_score: bool,
    pub status: GameStatus,
    pub outcome: Option<Outcome>,
    pub wall_mode: WallMode,
    pub wall_mode_selectable: bool,
}

/// One play session. Owns every game entity; `restart` rebuilds them.
pub struct GameState {
    variant: Variant,
    rules: Rules,
    grid: GridSize,
    snake: Snake,
    food: Option<Cell>,
    pending_direction: Option<Direction>,
    status: GameStatus,
    outcome: Option<Outcome>,
    score: u32,
    wall_mode: WallMode,
    rng: StdRng,
}

impl GameState {
    pub fn new(variant: Variant, grid: GridSize, wall_mode: WallMode, mut rng: StdRng) -> Self {
        let rules = variant.rules();
        let wall_mode = if rules.wall_mode_selectable { wall_mode } else { WallMode::Solid };
        let snake = Snake::new(grid.center(), INITIAL_DIRECTION);
        let food = spawn_food(&grid, &snake, &mut rng);

        log!("New {} game on {}x{} grid, walls {}", variant.label(), grid.width, grid.height, wall_mode.label());

        GameState {
            variant,
            rules,
            grid,
            snake,
            food,
            pending_direction: None,
            status: rules.initial_status,
            outcome: None,
            score: 0,
            wall_mode,
            rng,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Buffers a turn for the next tick. Reversals of the committed direction
    /// are refused. The first request while idle starts the game.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        match self.status {
            GameStatus::GameOver => return false,
            GameStatus::Idle => {
                self.status = GameStatus::Running;
                log!("Game started");
            }
            GameStatus::Running | GameStatus::Paused => {}
        }

        if direction.is_opposite(self.snake.direction()) {
            return false;
        }

        self.pending_direction = Some(direction);
        true
    }

    pub fn toggle_running(&mut self) {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused | GameStatus::Idle => GameStatus::Running,
            GameStatus::GameOver => GameStatus::GameOver,
        };
        log!("Status is now {:?}", self.status);
    }

    /// Only variants with selectable walls accept a change.
    pub fn set_wall_mode(&mut self, mode: WallMode) -> bool {
        if !self.rules.wall_mode_selectable {
            return false;
        }
        if self.wall_mode != mode {
            self.wall_mode = mode;
            log!("Wall mode set to {}", mode.label());
        }
        true
    }

    pub fn wall_mode(&self) -> WallMode {
        self.wall_mode
    }

    /// Starts a fresh session. The wall mode is a player setting and carries over.
    pub fn restart(&mut self) {
        self.snake = Snake::new(self.grid.center(), INITIAL_DIRECTION);
        self.food = spawn_food(&self.grid, &self.snake, &mut self.rng);
        self.pending_direction = None;
        self.status = GameStatus::Running;
        self.outcome = None;
        self.score = 0;
        log!("Game restarted");
    }

    /// One simulation step. Does nothing unless the game is running.
    pub fn tick(&mut self) -> Tick {
        if self.status != GameStatus::Running {
            return Tick::Skipped;
        }

        if let Some(dir) = self.pending_direction.take() {
            self.snake.set_direction(dir);
        }

        match self.snake.move_step(&self.grid, self.wall_mode, self.food) {
            MoveResult::Crashed(collision) => self.end(Outcome::Crashed(collision)),
            MoveResult::Moved { old_tail: Some(_), .. } => Tick::Moved,
            MoveResult::Moved { new_head, old_tail: None } => {
                self.score += self.rules.food_reward;
                log!("Ate food at ({}, {}). Length: {}, score: {}", new_head.x, new_head.y, self.snake.len(), self.score);

                self.food = spawn_food(&self.grid, &self.snake, &mut self.rng);
                match self.food {
                    Some(_) => Tick::Ate,
                    None => self.end(Outcome::Won),
                }
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            variant: self.variant,
            grid: self.grid,
            snake: self.snake.body().iter().copied().collect(),
            direction: self.snake.direction(),
            food: self.food,
            score: self.score,
            shows_score: self.rules.shows_score,
            status: self.status,
            outcome: self.outcome,
            wall_mode: self.wall_mode,
            wall_mode_selectable: self.rules.wall_mode_selectable,
        }
    }

    fn end(&mut self, outcome: Outcome) -> Tick {
        self.status = GameStatus::GameOver;
        self.outcome = Some(outcome);
        log!("Game over: {:?}, length {}, score {}", outcome, self.snake.len(), self.score);
        Tick::Ended(outcome)
    }

    #[cfg(test)]
    fn place(&mut self, snake: Snake, food: Option<Cell>) {
        self.snake = snake;
        self.food = food;
    }
}

/// Picks uniformly among cells the snake does not cover.
fn spawn_food(grid: &GridSize, snake: &Snake, rng: &mut StdRng) -> Option<Cell> {
    let choices: Vec<Cell> = grid.cells().filter(|cell| !snake.occupies(*cell)).collect();
    choices.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use Direction::*;

    fn grid() -> GridSize {
        GridSize::new(20, 20)
    }

    fn new_game(variant: Variant, wall_mode: WallMode) -> GameState {
        GameState::new(variant, grid(), wall_mode, StdRng::seed_from_u64(7))
    }

    fn running_game(variant: Variant, wall_mode: WallMode) -> GameState {
        let mut game = new_game(variant, wall_mode);
        if game.status() == GameStatus::Idle {
            game.toggle_running();
        }
        game
    }

    #[test]
    fn test_initial_state() {
        let classic = new_game(Variant::Classic, WallMode::Passthrough);
        let snap = classic.snapshot();
        assert_eq!(snap.status, GameStatus::Running);
        assert_eq!(snap.snake, vec![Cell::new(10, 10)]);
        assert_eq!(snap.direction, Right);
        assert_eq!(snap.wall_mode, WallMode::Solid);
        assert!(snap.food.is_some());
        assert_ne!(snap.food, Some(Cell::new(10, 10)));

        let arcade = new_game(Variant::Arcade, WallMode::Passthrough);
        assert_eq!(arcade.status(), GameStatus::Idle);
        assert_eq!(arcade.wall_mode(), WallMode::Passthrough);
    }

    #[test]
    fn test_eating_grows_and_scores_in_arcade() {
        let mut game = running_game(Variant::Arcade, WallMode::Solid);
        game.place(Snake::new(Cell::new(10, 10), Right), Some(Cell::new(11, 10)));

        assert_eq!(game.tick(), Tick::Ate);

        let snap = game.snapshot();
        assert_eq!(snap.snake, vec![Cell::new(11, 10), Cell::new(10, 10)]);
        assert_eq!(snap.score, 5);
        let food = snap.food.unwrap();
        assert_ne!(food, Cell::new(11, 10));
        assert!(!snap.snake.contains(&food));
    }

    #[test]
    fn test_eating_in_classic_keeps_score() {
        let mut game = running_game(Variant::Classic, WallMode::Solid);
        game.place(Snake::new(Cell::new(10, 10), Right), Some(Cell::new(11, 10)));

        assert_eq!(game.tick(), Tick::Ate);
        assert_eq!(game.snapshot().score, 0);
        assert_eq!(game.snapshot().snake.len(), 2);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut game = running_game(Variant::Arcade, WallMode::Solid);
        let cells = [Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)];
        game.place(Snake::from_cells(&cells, Right), Some(Cell::new(0, 0)));

        assert_eq!(game.tick(), Tick::Moved);
        let snap = game.snapshot();
        assert_eq!(snap.snake, vec![Cell::new(11, 10), Cell::new(10, 10), Cell::new(9, 10)]);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.food, Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_solid_wall_ends_game_and_freezes_snake() {
        let mut game = running_game(Variant::Arcade, WallMode::Solid);
        game.place(Snake::new(Cell::new(0, 10), Left), Some(Cell::new(5, 5)));

        assert_eq!(game.tick(), Tick::Ended(Outcome::Crashed(Collision::Wall)));
        let snap = game.snapshot();
        assert_eq!(snap.status, GameStatus::GameOver);
        assert_eq!(snap.snake, vec![Cell::new(0, 10)]);
    }

    #[test]
    fn test_passthrough_wraps_and_continues() {
        let mut game = running_game(Variant::Arcade, WallMode::Passthrough);
        game.place(Snake::new(Cell::new(0, 10), Left), Some(Cell::new(5, 5)));

        assert_eq!(game.tick(), Tick::Moved);
        let snap = game.snapshot();
        assert_eq!(snap.snake, vec![Cell::new(19, 10)]);
        assert_eq!(snap.status, GameStatus::Running);
    }

    #[test]
    fn test_wall_mode_change_applies_on_next_step() {
        let mut game = running_game(Variant::Arcade, WallMode::Solid);
        game.place(Snake::new(Cell::new(19, 3), Right), Some(Cell::new(5, 5)));

        assert!(game.set_wall_mode(WallMode::Passthrough));
        assert_eq!(game.tick(), Tick::Moved);
        assert_eq!(game.snapshot().snake, vec![Cell::new(0, 3)]);
    }

    #[test]
    fn test_classic_ignores_wall_mode() {
        let mut game = running_game(Variant::Classic, WallMode::Solid);
        assert!(!game.set_wall_mode(WallMode::Passthrough));
        assert_eq!(game.wall_mode(), WallMode::Solid);
    }

    #[test]
    fn test_self_collision_ends_once() {
        let mut game = running_game(Variant::Arcade, WallMode::Solid);
        let cells = [Cell::new(5, 5), Cell::new(6, 5), Cell::new(6, 6), Cell::new(5, 6), Cell::new(4, 6)];
        game.place(Snake::from_cells(&cells, Down), Some(Cell::new(0, 0)));

        assert_eq!(game.tick(), Tick::Ended(Outcome::Crashed(Collision::SelfBite)));
        let frozen = game.snapshot();

        assert_eq!(game.tick(), Tick::Skipped);
        assert!(!game.request_direction(Left));
        game.toggle_running();
        assert_eq!(game.tick(), Tick::Skipped);
        assert_eq!(game.snapshot(), frozen);
    }

    #[test]
    fn test_chasing_tail_is_allowed() {
        let mut game = running_game(Variant::Arcade, WallMode::Solid);
        let cells = [Cell::new(5, 5), Cell::new(6, 5), Cell::new(6, 6), Cell::new(5, 6)];
        game.place(Snake::from_cells(&cells, Down), Some(Cell::new(0, 0)));

        for dir in [Down, Right, Up, Left, Down, Right, Up, Left] {
            assert!(game.request_direction(dir));
            assert_eq!(game.tick(), Tick::Moved);
        }
        assert_eq!(game.snapshot().snake, cells.to_vec());
    }

    #[test]
    fn test_reversal_is_never_committed() {
        let mut game = running_game(Variant::Arcade, WallMode::Passthrough);
        assert!(!game.request_direction(Left));
        game.tick();
        assert_eq!(game.snapshot().direction, Right);
    }

    #[test]
    fn test_last_valid_request_wins() {
        let mut game = running_game(Variant::Arcade, WallMode::Passthrough);
        assert!(game.request_direction(Up));
        assert!(game.request_direction(Down));
        assert!(!game.request_direction(Left));
        game.tick();

        let snap = game.snapshot();
        assert_eq!(snap.direction, Down);
        assert_eq!(snap.snake[0], Cell::new(10, 11));
    }

    #[test]
    fn test_request_is_buffered_until_tick() {
        let mut game = running_game(Variant::Classic, WallMode::Solid);
        game.request_direction(Up);
        assert_eq!(game.snapshot().direction, Right);
        game.tick();
        assert_eq!(game.snapshot().direction, Up);
    }

    #[test]
    fn test_first_direction_starts_idle_game() {
        let mut game = new_game(Variant::Arcade, WallMode::Solid);
        assert_eq!(game.tick(), Tick::Skipped);

        assert!(game.request_direction(Down));
        assert_eq!(game.status(), GameStatus::Running);
        game.tick();
        assert_eq!(game.snapshot().snake[0], Cell::new(10, 11));
    }

    #[test]
    fn test_pause_suspends_ticks() {
        let mut game = running_game(Variant::Classic, WallMode::Solid);
        game.toggle_running();
        assert_eq!(game.status(), GameStatus::Paused);

        let before = game.snapshot();
        assert_eq!(game.tick(), Tick::Skipped);
        assert!(game.request_direction(Up));
        assert_eq!(game.status(), GameStatus::Paused);
        assert_eq!(game.snapshot(), before);

        game.toggle_running();
        game.tick();
        assert_eq!(game.snapshot().direction, Up);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut game = running_game(Variant::Arcade, WallMode::Solid);
        game.set_wall_mode(WallMode::Passthrough);
        game.place(Snake::new(Cell::new(10, 10), Right), Some(Cell::new(11, 10)));
        game.tick();
        game.request_direction(Up);
        game.toggle_running();

        game.restart();

        let snap = game.snapshot();
        assert_eq!(snap.snake, vec![Cell::new(10, 10)]);
        assert_eq!(snap.direction, Right);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.status, GameStatus::Running);
        assert_eq!(snap.outcome, None);
        assert_eq!(snap.wall_mode, WallMode::Passthrough);
        assert!(snap.food.is_some());
        assert_ne!(snap.food, Some(Cell::new(10, 10)));

        game.tick();
        assert_eq!(game.snapshot().direction, Right);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = running_game(Variant::Classic, WallMode::Solid);
        game.place(Snake::new(Cell::new(19, 0), Right), None);
        game.tick();
        assert_eq!(game.status(), GameStatus::GameOver);

        game.restart();
        assert_eq!(game.status(), GameStatus::Running);
        assert!(matches!(game.tick(), Tick::Moved | Tick::Ate));
    }

    #[test]
    fn test_filling_the_grid_wins() {
        let mut game = GameState::new(Variant::Arcade, GridSize::new(2, 1), WallMode::Passthrough, StdRng::seed_from_u64(1));
        assert_eq!(game.snapshot().food, Some(Cell::new(0, 0)));
        game.toggle_running();

        assert_eq!(game.tick(), Tick::Ended(Outcome::Won));
        let snap = game.snapshot();
        assert_eq!(snap.food, None);
        assert_eq!(snap.snake.len(), 2);
        assert_eq!(snap.score, 5);
    }

    #[test]
    fn test_food_never_spawns_on_snake() {
        let grid = GridSize::new(5, 5);
        let cells: Vec<Cell> = grid.cells().take(20).collect();
        let snake = Snake::from_cells(&cells, Right);

        for seed in 0..200 {
            let food = spawn_food(&grid, &snake, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(!snake.occupies(food));
        }
    }
}
