//! Simulation constants.

pub const ROWS: usize = 10;
pub const COLS: usize = 15;
pub const OBSTACLE_COUNT: usize = 30;
pub const MAX_STEPS: usize = 200;
pub const START_ROW: usize = 0;
pub const START_COL: usize = 0;
pub const TICKS_PER_SECOND: u64 = 5;
/// How long the final frame stays up once the run is over.
pub const LINGER_MS: u64 = 3000;
pub const LOG_FILE: &str = "reactive_grid.log";
