//! Headless play state for a level: painting, move counting, undo, stars.
//!
//! The renderer drives one of these per level so that what the player sees
//! uses exactly the slide rules the generator solved against.

use crate::procedural::{stars_for, undo_allowance};
use crate::slide::simulate_slide;
use crate::types::{Cell, Direction, Grid, LevelData, Mode};

/// A move that was applied, kept for undo.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AppliedMove {
    from: (usize, usize),
    /// Cells this move turned from `Path` to `Painted`.
    painted: Vec<usize>,
}

/// Result of trying a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub end_x: usize,
    pub end_y: usize,
    /// Cells crossed, in travel order.
    pub tiles: Vec<usize>,
    /// How many of them were newly painted.
    pub newly_painted: usize,
}

#[derive(Debug, Clone)]
pub struct PlaySession {
    grid: Grid,
    x: usize,
    y: usize,
    target_moves: usize,
    moves: usize,
    painted: usize,
    total: usize,
    history: Vec<AppliedMove>,
    undos_left: u32,
}

impl PlaySession {
    /// Start playing `level` in `mode`. The start tile is painted at once.
    pub fn new(level: &LevelData, mode: Mode) -> Self {
        let mut grid = level.board.clone();
        let total = grid.path_count();
        let mut painted = 0;
        if grid.get(level.start_x, level.start_y) == Cell::Path {
            grid.set(level.start_x, level.start_y, Cell::Painted);
            painted = 1;
        }
        Self {
            grid,
            x: level.start_x,
            y: level.start_y,
            target_moves: level.target_moves,
            moves: 0,
            painted,
            total,
            history: Vec::new(),
            undos_left: undo_allowance(level.id, mode),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn undos_left(&self) -> u32 {
        self.undos_left
    }

    /// Fraction of path tiles painted, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.painted as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.painted >= self.total
    }

    /// Stars earned for the moves made so far.
    pub fn stars(&self) -> u8 {
        stars_for(self.moves, self.target_moves)
    }

    /// Slide the ball. Blocked moves and moves after completion return `None`
    /// and are not counted.
    pub fn apply(&mut self, dir: Direction) -> Option<MoveOutcome> {
        if self.is_complete() {
            return None;
        }
        let slide = simulate_slide(&self.grid, self.x, self.y, dir);
        if !slide.moved() {
            return None;
        }

        let mut painted = Vec::new();
        for &idx in &slide.tiles {
            if self.grid.cells[idx] == Cell::Path {
                self.grid.cells[idx] = Cell::Painted;
                painted.push(idx);
            }
        }
        self.painted += painted.len();
        self.moves += 1;

        let outcome = MoveOutcome {
            end_x: slide.end_x,
            end_y: slide.end_y,
            tiles: slide.tiles,
            newly_painted: painted.len(),
        };
        self.history.push(AppliedMove {
            from: (self.x, self.y),
            painted,
        });
        self.x = slide.end_x;
        self.y = slide.end_y;
        Some(outcome)
    }

    /// Take back the last move. Fails when nothing can be undone or the
    /// allowance is spent. An undone move still counts towards the total.
    pub fn undo(&mut self) -> bool {
        if self.undos_left == 0 {
            return false;
        }
        let Some(last) = self.history.pop() else {
            return false;
        };
        for idx in &last.painted {
            self.grid.cells[*idx] = Cell::Path;
        }
        self.painted -= last.painted.len();
        (self.x, self.y) = last.from;
        self.undos_left -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{color_index, level_name};

    fn level() -> LevelData {
        LevelData {
            id: 1,
            name: level_name(1),
            board: Grid::from_rows(&[
                "#######",
                "#.....#",
                "#.###.#",
                "#.....#",
                "#######",
            ]),
            start_x: 1,
            start_y: 1,
            target_moves: 4,
            color_index: color_index(1),
            solution: None,
            difficulty: None,
        }
    }

    #[test]
    fn test_start_is_painted() {
        let session = PlaySession::new(&level(), Mode::Thinking);
        assert_eq!(session.grid().get(1, 1), Cell::Painted);
        assert!(session.progress() > 0.0);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_playing_the_solution_completes() {
        let mut session = PlaySession::new(&level(), Mode::Thinking);
        for dir in [Direction::Down, Direction::Right, Direction::Up, Direction::Left] {
            assert!(session.apply(dir).is_some());
        }
        assert!(session.is_complete());
        assert_eq!(session.progress(), 1.0);
        assert_eq!(session.stars(), 3);
        assert!(session.apply(Direction::Right).is_none());
    }

    #[test]
    fn test_blocked_move_is_not_counted() {
        let mut session = PlaySession::new(&level(), Mode::Thinking);
        assert!(session.apply(Direction::Up).is_none());
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_revisiting_paints_nothing_new() {
        let mut session = PlaySession::new(&level(), Mode::Thinking);
        let first = session.apply(Direction::Right).unwrap();
        assert_eq!(first.newly_painted, 4);
        let back = session.apply(Direction::Left).unwrap();
        assert_eq!(back.newly_painted, 0);
        assert_eq!(session.moves(), 2);
    }

    #[test]
    fn test_undo_restores_paint_and_position() {
        let mut session = PlaySession::new(&level(), Mode::Thinking);
        session.apply(Direction::Right).unwrap();
        assert!(session.undo());
        assert_eq!(session.position(), (1, 1));
        assert_eq!(session.grid().get(3, 1), Cell::Path);
        assert_eq!(session.undos_left(), 4);
        assert!(!session.undo());
    }

    #[test]
    fn test_undo_allowance_runs_out() {
        let mut session = PlaySession::new(&level(), Mode::Thinking);
        for _ in 0..5 {
            session.apply(Direction::Right).unwrap();
            assert!(session.undo());
        }
        session.apply(Direction::Right).unwrap();
        assert!(!session.undo());
        assert_eq!(session.moves(), 6);
    }

    #[test]
    fn test_stars_drop_with_extra_moves() {
        let mut session = PlaySession::new(&level(), Mode::Relaxing);
        for dir in [
            Direction::Right,
            Direction::Left,
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Up,
        ] {
            session.apply(dir).unwrap();
        }
        assert!(session.is_complete());
        assert_eq!(session.stars(), 2);
    }
}
