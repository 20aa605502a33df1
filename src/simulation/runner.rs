//! The tick loop and the simulation context that owns all mutable state.

use std::convert::Infallible;
use std::fmt;
use std::ops::ControlFlow;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::simulation::agent::{AgentState, ReactiveAgent, StepOutcome};
use crate::simulation::error::Result;
use crate::simulation::grid::{GridWorld, Position};
use crate::simulation::params::{COLS, MAX_STEPS, OBSTACLE_COUNT, ROWS};

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Termination {
    /// All `MAX_STEPS` ticks were executed.
    StepBudgetExhausted,
    /// The agent had no empty neighbour.
    Trapped,
    /// The observer asked to stop.
    Quit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StepBudgetExhausted => "step budget exhausted",
            Self::Trapped => "agent trapped",
            Self::Quit => "quit",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed, including the one on which the agent got trapped.
    pub steps: usize,
    pub termination: Termination,
    pub final_position: Position,
    pub seed: u64,
}

/// Read-only snapshot handed to observers at the start of each tick.
#[derive(Clone, Copy, Debug)]
pub struct TickView<'a> {
    pub tick: usize,
    pub max_steps: usize,
    pub seed: u64,
    pub world: &'a GridWorld,
    pub position: Position,
    pub state: AgentState,
}

/// Presentation hook (rendering, frame pacing, quit handling).
///
/// Called once per tick before the agent moves, and once more with the final
/// state when the run ends.
pub trait TickObserver {
    type Error;

    /// Return `ControlFlow::Break(())` to stop before the next tick.
    ///
    /// # Errors
    /// Whatever the observer's own I/O produces; the run aborts with it.
    fn on_tick(
        &mut self,
        view: &TickView<'_>,
    ) -> std::result::Result<ControlFlow<()>, Self::Error>;

    /// Called once after the loop ends. The default does nothing.
    ///
    /// # Errors
    /// As for [`TickObserver::on_tick`].
    fn on_finish(
        &mut self,
        _view: &TickView<'_>,
        _summary: &RunSummary,
    ) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Observer that never interferes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl TickObserver for Headless {
    type Error = Infallible;

    fn on_tick(
        &mut self,
        _view: &TickView<'_>,
    ) -> std::result::Result<ControlFlow<()>, Infallible> {
        Ok(ControlFlow::Continue(()))
    }
}

/// Owns the world, the agent and the random source for one run.
#[derive(Debug, Clone)]
pub struct Simulation {
    world: GridWorld,
    agent: ReactiveAgent,
    rng: ChaCha8Rng,
    seed: u64,
    tick: usize,
    max_steps: usize,
}

impl Simulation {
    /// Builds the default `ROWS x COLS` world with `OBSTACLE_COUNT` obstacles.
    ///
    /// Obstacle placement and every later decision draw from one RNG seeded
    /// with `seed`, so equal seeds give identical runs.
    ///
    /// # Errors
    /// Propagates grid construction errors.
    pub fn new(seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let world = GridWorld::initialize(ROWS, COLS, OBSTACLE_COUNT, &mut rng)?;
        Ok(Self::from_parts(world, rng, seed))
    }

    /// Wraps a prebuilt world; the seed only drives the agent's choices.
    #[must_use]
    pub fn with_world(world: GridWorld, seed: u64) -> Self {
        Self::from_parts(world, ChaCha8Rng::seed_from_u64(seed), seed)
    }

    fn from_parts(world: GridWorld, rng: ChaCha8Rng, seed: u64) -> Self {
        Self {
            world,
            agent: ReactiveAgent::default(),
            rng,
            seed,
            tick: 0,
            max_steps: MAX_STEPS,
        }
    }

    /// Overrides the tick budget.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub const fn world(&self) -> &GridWorld {
        &self.world
    }

    #[must_use]
    pub const fn agent(&self) -> &ReactiveAgent {
        &self.agent
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn tick(&self) -> usize {
        self.tick
    }

    #[must_use]
    pub fn view(&self) -> TickView<'_> {
        TickView {
            tick: self.tick,
            max_steps: self.max_steps,
            seed: self.seed,
            world: &self.world,
            position: self.agent.position,
            state: self.agent.state,
        }
    }

    /// True once the agent is trapped or the tick budget is spent.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.agent.is_trapped() || self.tick >= self.max_steps
    }

    /// Advances one tick without any observer.
    ///
    /// Returns `None`, leaving the tick counter alone, once the run is over.
    pub fn step(&mut self) -> Option<StepOutcome> {
        if self.is_finished() {
            return None;
        }
        self.tick += 1;
        Some(self.agent.step(&self.world, &mut self.rng))
    }

    /// Runs to completion with no presentation attached.
    pub fn run(&mut self) -> RunSummary {
        match self.run_with(&mut Headless) {
            Ok(summary) => summary,
            Err(never) => match never {},
        }
    }

    /// Runs until the budget is spent, the agent is trapped, or `observer`
    /// breaks.
    ///
    /// # Errors
    /// Returns the first error produced by `observer`.
    pub fn run_with<O: TickObserver>(
        &mut self,
        observer: &mut O,
    ) -> std::result::Result<RunSummary, O::Error> {
        info!(
            seed = self.seed,
            rows = self.world.rows(),
            cols = self.world.cols(),
            obstacles = self.world.obstacle_count(),
            max_steps = self.max_steps,
            "simulation started"
        );

        let termination = loop {
            if self.agent.is_trapped() {
                break Termination::Trapped;
            }
            if self.tick >= self.max_steps {
                break Termination::StepBudgetExhausted;
            }
            if observer.on_tick(&self.view())?.is_break() {
                break Termination::Quit;
            }
            if let Some(StepOutcome::Trapped { .. }) = self.step() {
                break Termination::Trapped;
            }
        };

        let summary = RunSummary {
            steps: self.tick,
            termination,
            final_position: self.agent.position,
            seed: self.seed,
        };
        info!(
            steps = summary.steps,
            %termination,
            position = %summary.final_position,
            "simulation finished"
        );
        observer.on_finish(&self.view(), &summary)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct QuitAfter(usize);

    impl TickObserver for QuitAfter {
        type Error = Infallible;

        fn on_tick(
            &mut self,
            view: &TickView<'_>,
        ) -> std::result::Result<ControlFlow<()>, Infallible> {
            Ok(if view.tick >= self.0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        }
    }

    #[test]
    fn test_quit_stops_before_next_tick() {
        let world = GridWorld::new(5, 5).unwrap();
        let mut sim = Simulation::with_world(world, 3);
        let summary = sim.run_with(&mut QuitAfter(4)).unwrap();
        assert_eq!(summary.termination, Termination::Quit);
        assert_eq!(summary.steps, 4);
    }

    #[test]
    fn test_open_grid_runs_full_budget() {
        let world = GridWorld::new(4, 4).unwrap();
        let mut sim = Simulation::with_world(world, 11).with_max_steps(50);
        let summary = sim.run();
        assert_eq!(summary.termination, Termination::StepBudgetExhausted);
        assert_eq!(summary.steps, 50);
        assert_eq!(sim.tick(), 50);
    }

    #[test]
    fn test_step_after_run_is_a_no_op() {
        let world = GridWorld::new(3, 3).unwrap();
        let mut sim = Simulation::with_world(world, 21).with_max_steps(10);
        let summary = sim.run();
        assert!(sim.is_finished());
        assert_eq!(sim.step(), None);
        assert_eq!(sim.tick(), summary.steps);
        assert_eq!(sim.agent().position, summary.final_position);
    }

    #[test]
    fn test_step_on_trapped_agent_keeps_tick() {
        let mut world = GridWorld::new(3, 3).unwrap();
        world.set_obstacle(Position::new(0, 1)).unwrap();
        world.set_obstacle(Position::new(1, 0)).unwrap();
        let mut sim = Simulation::with_world(world, 2);

        assert_eq!(
            sim.step(),
            Some(StepOutcome::Trapped { at: Position::START })
        );
        assert_eq!(sim.tick(), 1);
        assert_eq!(sim.step(), None);
        assert_eq!(sim.tick(), 1);
        assert_eq!(sim.run().steps, 1);
    }

    #[test]
    fn test_zero_budget() {
        let world = GridWorld::new(2, 2).unwrap();
        let mut sim = Simulation::with_world(world, 0).with_max_steps(0);
        let summary = sim.run();
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.final_position, Position::START);
    }
}
