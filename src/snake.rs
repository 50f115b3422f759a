use std::collections::VecDeque;

use crate::grid::{Cell, GridSize, WallMode};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn vector(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the snake grew this step.
    Moved { new_head: Cell, old_tail: Option<Cell> },
    Crashed(Collision)
}

/// Head-first body: index 0 is the head, the back is the tail.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    pub fn new(pos: Cell, direction: Direction) -> Self {
        Snake { body: VecDeque::from(vec![pos]), direction }
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Cell], direction: Direction) -> Self {
        assert!(!cells.is_empty(), "a snake needs at least one segment");
        Snake { body: cells.iter().copied().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Advances one cell in the current direction. On a crash the body is left
    /// exactly as it was.
    pub fn move_step(&mut self, grid: &GridSize, wall_mode: WallMode, food: Option<Cell>) -> MoveResult {
        let candidate = match grid.resolve(self.head().offset(self.direction.vector()), wall_mode) {
            Some(cell) => cell,
            None => return Crashed(Collision::Wall),
        };

        let grows = food == Some(candidate);

        // The tail is vacated this step unless the snake grows, so it may be entered.
        let solid_len = if grows { self.body.len() } else { self.body.len() - 1 };
        if self.body.iter().take(solid_len).any(|c| *c == candidate) {
            return Crashed(Collision::SelfBite);
        }

        self.body.push_front(candidate);

        if grows {
            Moved { new_head: candidate, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head: candidate, old_tail }
        }
    }

    /// Returns whether the direction was accepted; reversals are refused.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.direction) {
            return false;
        }
        self.direction = new_direction;
        true
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}
