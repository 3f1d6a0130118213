//! Slide simulation: the ball's only movement primitive.
//!
//! The ball travels in one direction until the next cell is a wall or lies
//! outside the grid. It never enters a wall. Generation, connectivity
//! checking, solving and play all go through these functions, so the
//! precomputed move counts match what the player sees.

use crate::types::{Direction, Grid};

/// Outcome of one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub end_x: usize,
    pub end_y: usize,
    /// Steps taken. Zero means the ball did not move.
    pub distance: usize,
    /// Flat indices of the cells crossed, start excluded, resting cell included.
    pub tiles: Vec<usize>,
}

impl Slide {
    pub fn moved(&self) -> bool {
        self.distance > 0
    }
}

/// Resting cell and distance of a slide, without collecting the path.
#[inline]
pub fn slide_end(grid: &Grid, x: usize, y: usize, dir: Direction) -> (usize, usize, usize) {
    let (mut cx, mut cy) = (x, y);
    let mut distance = 0;
    while let Some((nx, ny)) = grid.step(cx, cy, dir) {
        if !grid.get(nx, ny).is_open() {
            break;
        }
        cx = nx;
        cy = ny;
        distance += 1;
    }
    (cx, cy, distance)
}

/// Simulate a full slide from `(x, y)` in `dir`.
pub fn simulate_slide(grid: &Grid, x: usize, y: usize, dir: Direction) -> Slide {
    let (end_x, end_y, distance) = slide_end(grid, x, y, dir);
    Slide {
        end_x,
        end_y,
        distance,
        tiles: path_indices(grid, x, y, dir, distance),
    }
}

/// Flat indices of the `distance` cells after `(x, y)` along `dir`.
///
/// The caller guarantees the cells exist, normally by taking `distance` from
/// [`slide_end`].
pub fn path_indices(grid: &Grid, x: usize, y: usize, dir: Direction, distance: usize) -> Vec<usize> {
    let (dx, dy) = dir.delta();
    (1..=distance as isize)
        .map(|i| {
            let px = (x as isize + dx * i) as usize;
            let py = (y as isize + dy * i) as usize;
            grid.index(px, py)
        })
        .collect()
}

/// Number of directions in which a slide from `(x, y)` moves at all.
pub fn exits(grid: &Grid, x: usize, y: usize) -> usize {
    Direction::ALL
        .iter()
        .filter(|&&dir| grid.step(x, y, dir).is_some_and(|(nx, ny)| grid.get(nx, ny).is_open()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        Grid::from_rows(&[
            "#######",
            "#.....#",
            "#.###.#",
            "#.....#",
            "#######",
        ])
    }

    #[test]
    fn test_slide_stops_before_wall() {
        let grid = corridor();
        let slide = simulate_slide(&grid, 1, 1, Direction::Right);
        assert_eq!((slide.end_x, slide.end_y, slide.distance), (5, 1, 4));
        assert_eq!(
            slide.tiles,
            vec![grid.index(2, 1), grid.index(3, 1), grid.index(4, 1), grid.index(5, 1)]
        );
    }

    #[test]
    fn test_blocked_slide_has_zero_distance() {
        let grid = corridor();
        let slide = simulate_slide(&grid, 1, 1, Direction::Up);
        assert!(!slide.moved());
        assert_eq!((slide.end_x, slide.end_y), (1, 1));
        assert!(slide.tiles.is_empty());
    }

    #[test]
    fn test_slide_stops_at_boundary() {
        let grid = Grid::from_rows(&["...", "..."]);
        assert_eq!(slide_end(&grid, 0, 0, Direction::Right), (2, 0, 2));
        assert_eq!(slide_end(&grid, 2, 1, Direction::Up), (2, 0, 1));
        assert_eq!(slide_end(&grid, 0, 0, Direction::Left), (0, 0, 0));
    }

    #[test]
    fn test_painted_cells_do_not_block() {
        let mut grid = corridor();
        grid.set(3, 1, crate::types::Cell::Painted);
        assert_eq!(slide_end(&grid, 1, 1, Direction::Right), (5, 1, 4));
    }

    #[test]
    fn test_exits() {
        let grid = corridor();
        assert_eq!(exits(&grid, 1, 1), 2);
        assert_eq!(exits(&grid, 3, 1), 2);
        let cross = Grid::from_rows(&["#####", "#...#", "#####"]);
        assert_eq!(exits(&cross, 2, 1), 2);
        assert_eq!(exits(&cross, 1, 1), 1);
    }
}
