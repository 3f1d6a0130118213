//! Slide-granularity reachability.
//!
//! A BFS where each step is a full slide. Every cell a slide passes over is
//! marked and queued, because a cell the ball only crosses is still paintable.

use std::collections::VecDeque;

use crate::slide::slide_end;
use crate::types::{Cell, Direction, Grid};

/// Mask of cells reachable from `(start_x, start_y)` by legal slides.
///
/// The start itself is included when it is open.
pub fn reachable(grid: &Grid, start_x: usize, start_y: usize) -> Vec<bool> {
    let mut visited = vec![false; grid.cells.len()];
    if !grid.is_open(start_x, start_y) {
        return visited;
    }

    let mut queue = VecDeque::new();
    visited[grid.index(start_x, start_y)] = true;
    queue.push_back((start_x, start_y));

    while let Some((x, y)) = queue.pop_front() {
        for dir in Direction::ALL {
            let (_, _, distance) = slide_end(grid, x, y, dir);
            let (dx, dy) = dir.delta();
            for i in 1..=distance as isize {
                let cx = (x as isize + dx * i) as usize;
                let cy = (y as isize + dy * i) as usize;
                let idx = grid.index(cx, cy);
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back((cx, cy));
                }
            }
        }
    }

    visited
}

/// True when every `Path` cell can be reached from the start.
pub fn validate_connectivity(grid: &Grid, start_x: usize, start_y: usize) -> bool {
    let path_count = grid.path_count();
    let visited = reachable(grid, start_x, start_y)
        .iter()
        .filter(|&&v| v)
        .count();
    visited >= path_count
}

/// Turn every unreachable `Path` cell back into a wall.
///
/// Walling off cells no slide ever touches cannot change any reachable slide,
/// so the surviving cells stay reachable. Returns the number of cells removed.
pub fn prune_unreachable(grid: &mut Grid, start_x: usize, start_y: usize) -> usize {
    let visited = reachable(grid, start_x, start_y);
    let mut removed = 0;
    for (cell, seen) in grid.cells.iter_mut().zip(visited) {
        if *cell == Cell::Path && !seen {
            *cell = Cell::Wall;
            removed += 1;
        }
    }
    removed
}
