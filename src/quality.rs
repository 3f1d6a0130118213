//! Heuristics that reject solvable but structurally trivial mazes.

use std::fmt;

use crate::slide::exits;
use crate::types::{Cell, DifficultyConfig, Direction, Grid};

/// Solutions may run this many moves past `max_moves`.
pub const MOVE_SLACK: usize = 4;

/// Why a solved maze was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Solution length outside `[min_moves, max_moves + MOVE_SLACK]`.
    MoveCount { moves: usize },
    /// Too few cells offering a real branching decision.
    Junctions { found: usize, required: usize },
    /// The solution barely uses the available space.
    Sparse { path_cells: usize, moves: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MoveCount { moves } => write!(f, "solution length {moves} out of range"),
            Rejection::Junctions { found, required } => {
                write!(f, "{found} junctions, need {required}")
            }
            Rejection::Sparse { path_cells, moves } => {
                write!(f, "{path_cells} path cells for {moves} moves")
            }
        }
    }
}

/// Path cells with at least three slide directions.
pub fn junction_count(grid: &Grid) -> usize {
    let mut count = 0;
    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.get(x, y) == Cell::Path && exits(grid, x, y) >= 3 {
                count += 1;
            }
        }
    }
    count
}

/// Path cells with fewer than two slide directions, border cells included.
pub fn dead_end_count(grid: &Grid) -> usize {
    grid.path_indices()
        .into_iter()
        .map(|idx| grid.coords(idx))
        .filter(|&(x, y)| exits(grid, x, y) < 2)
        .count()
}

/// Run every filter against a solved maze.
///
/// `junction_ratio` is the mode-dependent fraction of `min_moves` that the
/// junction count must reach.
pub fn assess(
    grid: &Grid,
    solution: &[Direction],
    config: &DifficultyConfig,
    junction_ratio: f64,
) -> Result<(), Rejection> {
    let moves = solution.len();
    if moves < config.min_moves || moves > config.max_moves + MOVE_SLACK {
        return Err(Rejection::MoveCount { moves });
    }

    let required = (config.min_moves as f64 * junction_ratio).floor() as usize;
    let found = junction_count(grid);
    if found < required {
        return Err(Rejection::Junctions { found, required });
    }

    // path_cells >= 1.5 * moves
    let path_cells = grid.path_count();
    if path_cells * 2 < moves * 3 {
        return Err(Rejection::Sparse { path_cells, moves });
    }

    Ok(())
}
