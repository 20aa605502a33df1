use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::simulation::grid::{Direction, GridWorld, Percepts, Position};

/// Lifecycle of the agent. `Trapped` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AgentState {
    #[default]
    Active,
    Trapped,
}

/// Result of a single [`ReactiveAgent::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved {
        from: Position,
        to: Position,
        direction: Direction,
    },
    /// No empty neighbour; the agent stays put for good.
    Trapped { at: Position },
}

/// Picks uniformly among the directions whose percept is `Empty`.
///
/// Returns `None` when every neighbour is an obstacle or a wall. Candidates are
/// considered in the fixed order up, down, left, right, so a seeded `rng`
/// always yields the same choice for the same percepts.
pub fn decide<R: Rng + ?Sized>(percepts: &Percepts, rng: &mut R) -> Option<Direction> {
    percepts.passable().choose(rng).copied()
}

/// A memoryless agent: everything it knows is what it perceives this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactiveAgent {
    pub position: Position,
    pub state: AgentState,
}

impl Default for ReactiveAgent {
    fn default() -> Self {
        Self::new(Position::START)
    }
}

impl ReactiveAgent {
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            state: AgentState::Active,
        }
    }

    #[must_use]
    pub fn is_trapped(&self) -> bool {
        self.state == AgentState::Trapped
    }

    /// Perceive, decide and move.
    ///
    /// 1. Reads the four neighbours from `world`.
    /// 2. Chooses a direction with [`decide`].
    /// 3. Applies the direction's delta to the position, or enters `Trapped`.
    ///
    /// A trapped agent never leaves its cell again.
    pub fn step<R: Rng + ?Sized>(&mut self, world: &GridWorld, rng: &mut R) -> StepOutcome {
        if self.is_trapped() {
            return StepOutcome::Trapped { at: self.position };
        }

        let percepts = world.percepts_at(self.position);
        let from = self.position;

        // `decide` only returns directions onto an in-bounds empty cell, so
        // `step` cannot underflow here.
        match decide(&percepts, rng).and_then(|d| from.step(d).map(|to| (d, to))) {
            Some((direction, to)) => {
                debug!(%from, %to, %direction, ?percepts, "agent moved");
                self.position = to;
                StepOutcome::Moved {
                    from,
                    to,
                    direction,
                }
            }
            None => {
                info!(at = %from, ?percepts, "agent is trapped");
                self.state = AgentState::Trapped;
                StepOutcome::Trapped { at: from }
            }
        }
    }
}
