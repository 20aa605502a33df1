use crate::simulation::grid::{Cell, GridWorld, Position};
use rayon::prelude::*;

pub const EMPTY: char = '.';
pub const OBSTACLE: char = '#';
pub const AGENT: char = '@';

/// Glyph for one cell, with the agent drawn over whatever is underneath.
#[must_use]
pub fn glyph_at(world: &GridWorld, position: Position, agent: Position) -> char {
    if position == agent {
        return AGENT;
    }
    match world.cell(position) {
        Some(Cell::Obstacle) => OBSTACLE,
        Some(Cell::Empty) | None => EMPTY,
    }
}

/// Rasterises the grid into one string per row, one char per cell.
#[must_use]
pub fn compute_field_grid(world: &GridWorld, agent: Position) -> Vec<String> {
    // Use rayon to compute rows in parallel
    (0..world.rows())
        .into_par_iter()
        .map(|r| {
            (0..world.cols())
                .map(|c| glyph_at(world, Position::new(r, c), agent))
                .collect::<String>()
        })
        .collect()
}
