use std::fmt;

use rand::seq::index;
use rand::Rng;
use tracing::debug;

use crate::simulation::error::{Result, SimulationError};
use crate::simulation::params::{START_COL, START_ROW};

/// Contents of a single grid cell. Fixed once the world is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Obstacle,
}

/// What the agent observes when it looks at a neighbouring coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Percept {
    Empty,
    Obstacle,
    /// The neighbour lies outside the grid.
    Wall,
}

impl From<Cell> for Percept {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::Empty,
            Cell::Obstacle => Self::Obstacle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions in perception order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// `(row, col)` offset of one move in this direction.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `(row, col)` grid coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Where every agent begins. Never holds an obstacle.
    pub const START: Self = Self {
        row: START_ROW,
        col: START_COL,
    };

    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring coordinate in `direction`, or `None` when it would
    /// underflow past row or column zero. Upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (d_row, d_col) = direction.delta();
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four percepts around a position, one per cardinal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Percepts {
    pub up: Percept,
    pub down: Percept,
    pub left: Percept,
    pub right: Percept,
}

impl Percepts {
    #[must_use]
    pub const fn get(&self, direction: Direction) -> Percept {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Iterates `(direction, percept)` pairs in the order up, down, left, right.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Percept)> + '_ {
        Direction::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Directions whose neighbour is an empty cell, in perception order.
    #[must_use]
    pub fn passable(&self) -> Vec<Direction> {
        self.iter()
            .filter(|&(_, p)| p == Percept::Empty)
            .map(|(d, _)| d)
            .collect()
    }
}

/// The occupancy grid the agent lives in.
///
/// Cells are stored row-major. Obstacles are placed once at construction and
/// the grid is read-only afterwards as far as the simulation is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridWorld {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl GridWorld {
    /// Creates an all-empty grid.
    ///
    /// # Errors
    /// Returns [`SimulationError::EmptyGrid`] if either dimension is zero and
    /// [`SimulationError::GridTooLarge`] if the cell count is not addressable.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SimulationError::EmptyGrid { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .filter(|&len| isize::try_from(len).is_ok())
            .ok_or(SimulationError::GridTooLarge { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Empty; len],
        })
    }

    /// Creates a grid and scatters `obstacle_count` obstacles over distinct
    /// cells, never on [`Position::START`].
    ///
    /// Free cells are enumerated and sampled without replacement, so this
    /// always terminates.
    ///
    /// # Errors
    /// Returns [`SimulationError::EmptyGrid`] for a zero dimension and
    /// [`SimulationError::TooManyObstacles`] when more obstacles are requested
    /// than there are cells besides the start cell.
    pub fn initialize<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        obstacle_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut world = Self::new(rows, cols)?;
        if !world.contains(Position::START) {
            return Err(SimulationError::OutOfBounds(Position::START));
        }

        let start_index = world.index(Position::START);
        let free: Vec<usize> = (0..world.cells.len())
            .filter(|&i| i != start_index)
            .collect();
        if obstacle_count > free.len() {
            return Err(SimulationError::TooManyObstacles {
                requested: obstacle_count,
                capacity: free.len(),
            });
        }

        for picked in index::sample(rng, free.len(), obstacle_count) {
            world.cells[free[picked]] = Cell::Obstacle;
        }

        debug!(rows, cols, obstacle_count, "grid initialised");
        Ok(world)
    }

    /// Marks a single cell as an obstacle.
    ///
    /// # Errors
    /// Fails for positions outside the grid and for the start cell.
    pub fn set_obstacle(&mut self, position: Position) -> Result<()> {
        if !self.contains(position) {
            return Err(SimulationError::OutOfBounds(position));
        }
        if position == Position::START {
            return Err(SimulationError::StartCellBlocked(position));
        }
        let i = self.index(position);
        self.cells[i] = Cell::Obstacle;
        Ok(())
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.contains(position).then(|| self.cells[self.index(position)])
    }

    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Obstacle).count()
    }

    /// Obstacle coordinates in row-major order.
    #[must_use]
    pub fn obstacle_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Obstacle)
            .map(|(i, _)| Position::new(i / self.cols, i % self.cols))
            .collect()
    }

    /// Observes the four neighbours of `position`.
    ///
    /// Neighbours outside the grid read as [`Percept::Wall`]. Pure: the same
    /// grid and position always give the same percepts.
    #[must_use]
    pub fn percepts_at(&self, position: Position) -> Percepts {
        let look = |direction: Direction| {
            position
                .step(direction)
                .and_then(|p| self.cell(p))
                .map_or(Percept::Wall, Percept::from)
        };
        Percepts {
            up: look(Direction::Up),
            down: look(Direction::Down),
            left: look(Direction::Left),
            right: look(Direction::Right),
        }
    }

    const fn index(&self, position: Position) -> usize {
        position.row * self.cols + position.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_grid_is_empty() {
        let world = GridWorld::new(3, 4).unwrap();
        assert_eq!(world.rows(), 3);
        assert_eq!(world.cols(), 4);
        assert_eq!(world.obstacle_count(), 0);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            GridWorld::new(0, 5),
            Err(SimulationError::EmptyGrid { rows: 0, cols: 5 })
        );
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert_eq!(
            GridWorld::new(usize::MAX, 2),
            Err(SimulationError::GridTooLarge {
                rows: usize::MAX,
                cols: 2,
            })
        );
        // Product wraps to zero in release builds.
        let (rows, cols) = (1 << (usize::BITS / 2 + 1), 1 << (usize::BITS / 2 - 1));
        assert_eq!(
            GridWorld::new(rows, cols),
            Err(SimulationError::GridTooLarge { rows, cols })
        );
        // No overflow, but more cells than a Vec can hold.
        let rows = 1usize << (usize::BITS - 1);
        assert_eq!(
            GridWorld::new(rows, 1),
            Err(SimulationError::GridTooLarge { rows, cols: 1 })
        );
    }

    #[test]
    fn test_position_step_underflow() {
        assert_eq!(Position::new(0, 0).step(Direction::Up), None);
        assert_eq!(Position::new(0, 0).step(Direction::Left), None);
        assert_eq!(
            Position::new(0, 0).step(Direction::Right),
            Some(Position::new(0, 1))
        );
    }

    #[test]
    fn test_full_capacity_placement() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let world = GridWorld::initialize(2, 2, 3, &mut rng).unwrap();
        assert_eq!(world.obstacle_count(), 3);
        assert_eq!(world.cell(Position::START), Some(Cell::Empty));
    }

    #[test]
    fn test_passable_keeps_order() {
        let percepts = Percepts {
            up: Percept::Wall,
            down: Percept::Empty,
            left: Percept::Obstacle,
            right: Percept::Empty,
        };
        assert_eq!(percepts.passable(), vec![Direction::Down, Direction::Right]);
    }
}
