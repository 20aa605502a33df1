use thiserror::Error;

use crate::simulation::grid::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("grid of {rows}x{cols} cells is too large to allocate")]
    GridTooLarge { rows: usize, cols: usize },

    #[error("cannot place {requested} obstacles: only {capacity} cells are free")]
    TooManyObstacles { requested: usize, capacity: usize },

    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("the start cell {0} must stay empty")]
    StartCellBlocked(Position),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
