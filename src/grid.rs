use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WallMode {
    Solid,
    Passthrough,
}

impl WallMode {
    pub fn toggled(self) -> Self {
        match self {
            WallMode::Solid => WallMode::Passthrough,
            WallMode::Passthrough => WallMode::Solid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WallMode::Solid => "solid",
            WallMode::Passthrough => "passthrough",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Applies the wall policy to a candidate cell. `None` means the cell hit a
    /// solid wall.
    pub fn resolve(&self, cell: Cell, mode: WallMode) -> Option<Cell> {
        match mode {
            WallMode::Solid => Some(cell).filter(|c| self.contains(*c)),
            WallMode::Passthrough => Some(Cell::new(
                cell.x.rem_euclid(self.width),
                cell.y.rem_euclid(self.height),
            )),
        }
    }

    /// Row-major iteration over every cell of the grid.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_rejects_every_edge() {
        let grid = GridSize::new(20, 20);
        for cell in [Cell::new(-1, 5), Cell::new(20, 5), Cell::new(5, -1), Cell::new(5, 20)] {
            assert_eq!(grid.resolve(cell, WallMode::Solid), None);
        }
        assert_eq!(grid.resolve(Cell::new(19, 0), WallMode::Solid), Some(Cell::new(19, 0)));
    }

    #[test]
    fn test_passthrough_wraps_to_opposite_edge() {
        let grid = GridSize::new(20, 20);
        assert_eq!(grid.resolve(Cell::new(-1, 10), WallMode::Passthrough), Some(Cell::new(19, 10)));
        assert_eq!(grid.resolve(Cell::new(20, 10), WallMode::Passthrough), Some(Cell::new(0, 10)));
        assert_eq!(grid.resolve(Cell::new(3, -1), WallMode::Passthrough), Some(Cell::new(3, 19)));
        assert_eq!(grid.resolve(Cell::new(3, 20), WallMode::Passthrough), Some(Cell::new(3, 0)));
    }

    #[test]
    fn test_passthrough_on_non_square_grid() {
        let grid = GridSize::new(7, 3);
        assert_eq!(grid.resolve(Cell::new(7, 3), WallMode::Passthrough), Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_cells_covers_grid() {
        let grid = GridSize::new(4, 3);
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), grid.area());
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[11], Cell::new(3, 2));
    }
}
