//! Coverage solver: finds a move sequence that paints every path tile.
//!
//! Contains:
//! - Depth-bounded DFS over slide moves (`solve`)
//! - Iterative deepening for a minimum-length sequence (`solve_shortest`)
//! - Replay of a move list against a grid (`replay_solution`, `is_solution`)
//!
//! The search keeps an explicit stack of frames instead of recursing, so deep
//! bounds in the hardest tiers cannot overflow the call stack (WASM stacks are
//! small).

use crate::error::MazeError;
use crate::slide::{path_indices, slide_end};
use crate::types::{Cell, Direction, Grid};

/// Default cap on expanded moves per search.
pub const DEFAULT_MAX_NODES: u64 = 200_000;

/// Resource limits for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverLimits {
    /// Longest move sequence explored.
    pub max_depth: usize,
    /// Moves the search may expand before giving up.
    pub max_nodes: u64,
}

impl SolverLimits {
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

// ─── Paint bitset ───────────────────────────────────────────────────────────

/// One bit per grid cell.
#[derive(Debug, Clone)]
struct PaintSet {
    words: Vec<u64>,
}

impl PaintSet {
    fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    #[inline(always)]
    fn contains(&self, idx: usize) -> bool {
        self.words[idx / 64] & (1 << (idx % 64)) != 0
    }

    #[inline(always)]
    fn insert(&mut self, idx: usize) {
        self.words[idx / 64] |= 1 << (idx % 64);
    }

    #[inline(always)]
    fn remove(&mut self, idx: usize) {
        self.words[idx / 64] &= !(1 << (idx % 64));
    }
}

// ─── DFS ────────────────────────────────────────────────────────────────────

struct Frame {
    x: usize,
    y: usize,
    next_dir: usize,
    /// Cells this frame's incoming move painted, unpainted on backtrack.
    changed: Vec<usize>,
}

/// Outcome of a bounded search.
enum Search {
    Found(Vec<Direction>),
    Exhausted,
    /// Node budget ran out; deeper bounds are pointless.
    OutOfBudget,
}

fn search(grid: &Grid, start_x: usize, start_y: usize, max_depth: usize, nodes: &mut u64, max_nodes: u64) -> Search {
    if !grid.is_open(start_x, start_y) {
        return Search::Exhausted;
    }
    let total = grid.path_count();
    let mut painted = PaintSet::new(grid.cells.len());
    let mut painted_count = 0usize;

    if grid.get(start_x, start_y) == Cell::Path {
        painted.insert(grid.index(start_x, start_y));
        painted_count = 1;
    }
    if painted_count >= total {
        return Search::Found(Vec::new());
    }

    let mut moves: Vec<Direction> = Vec::with_capacity(max_depth);
    let mut stack = vec![Frame {
        x: start_x,
        y: start_y,
        next_dir: 0,
        changed: Vec::new(),
    }];

    while let Some(top) = stack.last_mut() {
        if top.next_dir >= Direction::ALL.len() {
            if let Some(frame) = stack.pop() {
                for idx in frame.changed {
                    painted.remove(idx);
                    painted_count -= 1;
                }
                if !stack.is_empty() {
                    moves.pop();
                }
            }
            continue;
        }

        let dir = Direction::ALL[top.next_dir];
        top.next_dir += 1;
        let (x, y) = (top.x, top.y);

        if moves.len() >= max_depth {
            continue;
        }

        let (end_x, end_y, distance) = slide_end(grid, x, y, dir);
        if distance == 0 {
            continue;
        }

        let newly: Vec<usize> = path_indices(grid, x, y, dir, distance)
            .into_iter()
            .filter(|&idx| grid.cells[idx] == Cell::Path && !painted.contains(idx))
            .collect();
        if newly.is_empty() {
            continue;
        }

        *nodes += 1;
        if *nodes > max_nodes {
            return Search::OutOfBudget;
        }

        for &idx in &newly {
            painted.insert(idx);
        }
        painted_count += newly.len();
        moves.push(dir);

        if painted_count >= total {
            return Search::Found(moves);
        }

        stack.push(Frame {
            x: end_x,
            y: end_y,
            next_dir: 0,
            changed: newly,
        });
    }

    Search::Exhausted
}

/// Find a move sequence painting every `Path` cell, starting at the given cell.
///
/// Returns the first sequence found by DFS in [`Direction::ALL`] order, which
/// is not necessarily the shortest. Moves that paint nothing new are pruned.
/// `None` when no sequence of at most `limits.max_depth` moves exists or the
/// node budget runs out.
pub fn solve(grid: &Grid, start_x: usize, start_y: usize, limits: SolverLimits) -> Option<Vec<Direction>> {
    let mut nodes = 0;
    match search(grid, start_x, start_y, limits.max_depth, &mut nodes, limits.max_nodes) {
        Search::Found(moves) => Some(moves),
        Search::Exhausted | Search::OutOfBudget => None,
    }
}

/// Like [`solve`], but returns a sequence of minimum length.
///
/// Iterative deepening: the bound grows one move at a time, so the first hit
/// is the shortest. The node budget is shared across all bounds.
pub fn solve_shortest(grid: &Grid, start_x: usize, start_y: usize, limits: SolverLimits) -> Option<Vec<Direction>> {
    let mut nodes = 0;
    for depth in 0..=limits.max_depth {
        match search(grid, start_x, start_y, depth, &mut nodes, limits.max_nodes) {
            Search::Found(moves) => return Some(moves),
            Search::Exhausted => {}
            Search::OutOfBudget => return None,
        }
    }
    None
}

// ─── Replay ─────────────────────────────────────────────────────────────────

/// Replay `moves` from the start and return the set of cells visited.
///
/// The start cell counts as visited. A move that cannot slide is an error.
pub fn replay_solution(
    grid: &Grid,
    start_x: usize,
    start_y: usize,
    moves: &[Direction],
) -> Result<Vec<bool>, MazeError> {
    if !grid.is_open(start_x, start_y) {
        return Err(MazeError::InvalidStart { x: start_x, y: start_y });
    }

    let mut visited = vec![false; grid.cells.len()];
    visited[grid.index(start_x, start_y)] = true;
    let (mut x, mut y) = (start_x, start_y);

    for (step, &direction) in moves.iter().enumerate() {
        let (end_x, end_y, distance) = slide_end(grid, x, y, direction);
        if distance == 0 {
            return Err(MazeError::BlockedMove { step, direction });
        }
        for idx in path_indices(grid, x, y, direction, distance) {
            visited[idx] = true;
        }
        x = end_x;
        y = end_y;
    }

    Ok(visited)
}

/// True when `moves` is legal and paints every `Path` cell.
pub fn is_solution(grid: &Grid, start_x: usize, start_y: usize, moves: &[Direction]) -> bool {
    match replay_solution(grid, start_x, start_y, moves) {
        Ok(visited) => grid
            .cells
            .iter()
            .zip(visited)
            .all(|(&cell, seen)| cell != Cell::Path || seen),
        Err(_) => false,
    }
}
