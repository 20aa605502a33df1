pub mod agent;
pub mod error;
pub mod grid;
pub mod params;
pub mod runner;

pub use agent::{decide, AgentState, ReactiveAgent, StepOutcome};
pub use error::{Result, SimulationError};
pub use grid::{Cell, Direction, GridWorld, Percept, Percepts, Position};
pub use runner::{Headless, RunSummary, Simulation, Termination, TickObserver, TickView};
