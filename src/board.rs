//! Board construction: the maze carving strategies.
//!
//! Each strategy builds a raw wall/path grid and picks a start cell using the
//! seeded generator. A strategy gives up by returning `None`; the orchestrator
//! then moves on to its next attempt. Every strategy leaves the outer ring of
//! the grid as walls so slides are always bounded.

use crate::connectivity::prune_unreachable;
use crate::rng::LevelRng;
use crate::settings::GeneratorSettings;
use crate::slide::{exits, path_indices, slide_end};
use crate::types::{Cell, DifficultyConfig, Direction, Grid, Mode};

/// Board size the lattice removal range is tuned for.
const SMALLEST_GRID: f64 = 7.0;

/// A carved board and its start cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeLayout {
    pub grid: Grid,
    pub start_x: usize,
    pub start_y: usize,
}

/// The interchangeable carving algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Winding main corridor with short dead-end spurs.
    BranchingCorridor,
    /// Open room with scattered obstacles.
    Room,
    /// Room with every dead end opened up afterwards.
    RelaxedRoom,
    /// Regular grid of corridors with cells knocked out.
    Lattice,
}

impl Strategy {
    /// Pick the strategy for one attempt.
    pub fn roll(mode: Mode, rng: &mut LevelRng) -> Strategy {
        let r = rng.next_f64();
        match mode {
            Mode::Thinking => {
                if r < 0.35 {
                    Strategy::BranchingCorridor
                } else if r < 0.70 {
                    Strategy::Room
                } else {
                    Strategy::Lattice
                }
            }
            Mode::Relaxing => {
                if r < 0.50 {
                    Strategy::RelaxedRoom
                } else if r < 0.70 {
                    Strategy::Room
                } else if r < 0.90 {
                    Strategy::Lattice
                } else {
                    Strategy::BranchingCorridor
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::BranchingCorridor => "branching-corridor",
            Strategy::Room => "room",
            Strategy::RelaxedRoom => "relaxed-room",
            Strategy::Lattice => "lattice",
        }
    }

    /// Carve one candidate board of `width` x `height`.
    pub fn attempt(
        self,
        rng: &mut LevelRng,
        width: usize,
        height: usize,
        config: &DifficultyConfig,
        settings: &GeneratorSettings,
    ) -> Option<MazeLayout> {
        // Interior must be at least 2x2.
        if width < 4 || height < 4 {
            return None;
        }
        match self {
            Strategy::BranchingCorridor => carve_branching(rng, width, height, config),
            Strategy::Room => carve_room(rng, width, height, config, settings, false),
            Strategy::RelaxedRoom => carve_room(rng, width, height, config, settings, true),
            Strategy::Lattice => carve_lattice(rng, width, height, config, settings),
        }
    }
}

// ─── Branching corridor ─────────────────────────────────────────────────────

/// Slide the ball from `(x, y)` along `dir`, carving up to `want` walls.
///
/// Open cells are passed through. The run stops before the margin, a locked
/// cell, or the first wall past `want`; that stopping cell is then locked so
/// later carving cannot extend this slide. Fails without touching the grid
/// when fewer than two walls would be opened.
fn carve_slide(
    grid: &mut Grid,
    locked: &mut [bool],
    x: usize,
    y: usize,
    dir: Direction,
    want: usize,
) -> Option<(usize, usize)> {
    let mut cells = Vec::new();
    let mut fresh = 0;
    let (mut cx, mut cy) = (x, y);

    while let Some((nx, ny)) = grid.step(cx, cy, dir) {
        if !grid.is_interior(nx, ny) || locked[grid.index(nx, ny)] {
            break;
        }
        if grid.get(nx, ny) == Cell::Wall {
            if fresh >= want {
                break;
            }
            fresh += 1;
        }
        cells.push((nx, ny));
        cx = nx;
        cy = ny;
    }

    if fresh < 2 {
        return None;
    }
    for &(px, py) in &cells {
        grid.set(px, py, Cell::Path);
    }
    if let Some((sx, sy)) = grid.step(cx, cy, dir) {
        if grid.is_interior(sx, sy) {
            locked[grid.index(sx, sy)] = true;
        }
    }
    Some((cx, cy))
}

/// Main corridor carved as a chain of slides, so the carving order is itself
/// a solution; spurs then hang off the cells where the ball comes to rest.
fn carve_branching(
    rng: &mut LevelRng,
    width: usize,
    height: usize,
    config: &DifficultyConfig,
) -> Option<MazeLayout> {
    let mut grid = Grid::new(width, height);
    let mut locked = vec![false; width * height];
    let start_x = 1 + rng.below(width - 2);
    let start_y = 1 + rng.below(height - 2);
    grid.set(start_x, start_y, Cell::Path);

    let mut rests = vec![(start_x, start_y)];
    let segments = rng.range_inclusive(config.min_moves, config.max_moves);
    let (mut cx, mut cy) = (start_x, start_y);
    let mut previous: Option<Direction> = None;

    for _ in 0..segments {
        let mut dirs = Direction::ALL;
        rng.shuffle(&mut dirs);
        // Reversing is allowed, but only as a last resort.
        if let Some(back) = previous.map(Direction::opposite) {
            if let Some(pos) = dirs.iter().position(|&d| d == back) {
                dirs[pos..].rotate_left(1);
            }
        }
        let want = rng.range_inclusive(2, 5);

        let mut advanced = false;
        for dir in dirs {
            if Some(dir) == previous {
                continue;
            }
            if let Some((ex, ey)) = carve_slide(&mut grid, &mut locked, cx, cy, dir, want) {
                cx = ex;
                cy = ey;
                rests.push((ex, ey));
                previous = Some(dir);
                advanced = true;
                break;
            }
        }
        if !advanced {
            break;
        }
    }
    // One resting cell per slide, plus the start.
    if rests.len() - 1 < config.min_moves {
        return None;
    }

    // Secondary branches: short spurs into solid rock.
    let branches = (segments / 2).max(2);
    for _ in 0..branches {
        let Some(&(bx, by)) = rng.pick(&rests) else { break };
        let dir = Direction::ALL[rng.below(4)];
        let len = rng.range_inclusive(1, 3);
        let (mut px, mut py) = (bx, by);
        for _ in 0..len {
            match grid.step(px, py, dir) {
                Some((nx, ny))
                    if grid.is_interior(nx, ny)
                        && grid.get(nx, ny) == Cell::Wall
                        && !locked[grid.index(nx, ny)] =>
                {
                    grid.set(nx, ny, Cell::Path);
                    px = nx;
                    py = ny;
                }
                _ => break,
            }
        }
    }

    if grid.path_count() < 2 * config.min_moves {
        return None;
    }

    Some(MazeLayout {
        grid,
        start_x,
        start_y,
    })
}

// ─── Room with obstacles ────────────────────────────────────────────────────

/// Cell offsets of one randomly shaped obstacle anchored at the origin.
fn obstacle_shape(rng: &mut LevelRng) -> Vec<(isize, isize)> {
    let roll = rng.next_f64();
    if roll < 0.40 {
        vec![(0, 0)]
    } else if roll < 0.70 {
        let len = rng.range_inclusive(2, 3) as isize;
        if rng.chance(0.5) {
            (0..len).map(|i| (i, 0)).collect()
        } else {
            (0..len).map(|i| (0, i)).collect()
        }
    } else if roll < 0.85 {
        let sx = if rng.chance(0.5) { 1 } else { -1 };
        let sy = if rng.chance(0.5) { 1 } else { -1 };
        vec![(0, 0), (sx, 0), (0, sy)]
    } else {
        vec![(0, 0), (1, 0), (0, 1), (1, 1)]
    }
}

/// Drop obstacles until `target` interior cells have been walled.
fn place_obstacles(grid: &mut Grid, rng: &mut LevelRng, target: usize) -> usize {
    let (width, height) = (grid.width, grid.height);
    let mut placed = 0;
    let mut tries = 0;
    let max_tries = target * 4 + 8;

    while placed < target && tries < max_tries {
        tries += 1;
        let ax = 1 + rng.below(width - 2);
        let ay = 1 + rng.below(height - 2);

        for (ox, oy) in obstacle_shape(rng) {
            let (Some(x), Some(y)) = (ax.checked_add_signed(ox), ay.checked_add_signed(oy)) else {
                continue;
            };
            if placed < target && grid.is_interior(x, y) && grid.get(x, y) == Cell::Path {
                grid.set(x, y, Cell::Wall);
                placed += 1;
            }
        }
    }

    placed
}

/// Open walls next to dead ends until every path cell has two exits.
///
/// Returns false when the iteration cap is hit first.
fn open_dead_ends(grid: &mut Grid, rng: &mut LevelRng) -> bool {
    let max_rounds = grid.cells.len() * 2;

    for _ in 0..max_rounds {
        let dead: Vec<(usize, usize)> = grid
            .path_indices()
            .into_iter()
            .map(|idx| grid.coords(idx))
            .filter(|&(x, y)| exits(grid, x, y) < 2)
            .collect();
        let Some(&(x, y)) = rng.pick(&dead) else {
            return true;
        };

        let walls: Vec<(usize, usize)> = Direction::ALL
            .iter()
            .filter_map(|&dir| grid.step(x, y, dir))
            .filter(|&(nx, ny)| grid.is_interior(nx, ny) && grid.get(nx, ny) == Cell::Wall)
            .collect();
        match rng.pick(&walls) {
            Some(&(wx, wy)) => grid.set(wx, wy, Cell::Path),
            None => return false,
        }
    }

    false
}

fn carve_room(
    rng: &mut LevelRng,
    width: usize,
    height: usize,
    config: &DifficultyConfig,
    settings: &GeneratorSettings,
    relaxed: bool,
) -> Option<MazeLayout> {
    let mut grid = Grid::new(width, height);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            grid.set(x, y, Cell::Path);
        }
    }

    let interior = (width - 2) * (height - 2);
    let (lo, hi) = settings.obstacle_density;
    let density = rng.range_f64(lo, hi);
    place_obstacles(&mut grid, rng, (interior as f64 * density) as usize);

    if relaxed && !open_dead_ends(&mut grid, rng) {
        return None;
    }
    let mut layout = finish_layout(grid, rng, config)?;
    // Tracing walls off cells, which can leave fresh dead ends behind.
    if relaxed && !open_dead_ends(&mut layout.grid, rng) {
        return None;
    }
    Some(layout)
}

// ─── Regular lattice ────────────────────────────────────────────────────────

fn carve_lattice(
    rng: &mut LevelRng,
    width: usize,
    height: usize,
    config: &DifficultyConfig,
    settings: &GeneratorSettings,
) -> Option<MazeLayout> {
    let mut grid = Grid::new(width, height);
    let spacing = rng.range_inclusive(2, 3);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if (x - 1) % spacing == 0 || (y - 1) % spacing == 0 {
                grid.set(x, y, Cell::Path);
            }
        }
    }

    let mut corridor = grid.path_indices();
    rng.shuffle(&mut corridor);
    // Removal shrinks on larger boards, which would otherwise fall apart
    // into islands.
    let scale = SMALLEST_GRID / width as f64;
    let (lo, hi) = settings.lattice_removal;
    let remove = (corridor.len() as f64 * rng.range_f64(lo * scale, hi * scale)) as usize;
    for &idx in corridor.iter().take(remove) {
        grid.cells[idx] = Cell::Wall;
    }

    finish_layout(grid, rng, config)
}

/// Whether a slide from `(x, y)` along `dir` would cross an unpainted cell.
fn paints_new(grid: &Grid, painted: &[bool], x: usize, y: usize, dir: Direction) -> bool {
    let (_, _, distance) = slide_end(grid, x, y, dir);
    path_indices(grid, x, y, dir, distance)
        .into_iter()
        .any(|idx| !painted[idx])
}

/// Walk the ball from the start for up to `min_moves..=max_moves` slides,
/// each painting something new. Returns the painted mask.
///
/// Walling off every cell outside the mask cannot change any slide of the
/// walk (none of them crosses such a cell), so the walk stays a solution of
/// the trimmed board.
fn trace_walk(grid: &Grid, rng: &mut LevelRng, config: &DifficultyConfig, start_x: usize, start_y: usize) -> Vec<bool> {
    let mut painted = vec![false; grid.cells.len()];
    painted[grid.index(start_x, start_y)] = true;
    let (mut x, mut y) = (start_x, start_y);
    let target = rng.range_inclusive(config.min_moves, config.max_moves);

    for _ in 0..target {
        let mut options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&dir| paints_new(grid, &painted, x, y, dir))
            .collect();
        if options.is_empty() {
            break;
        }
        // Prefer slides that do not strand the ball.
        let onward: Vec<Direction> = options
            .iter()
            .copied()
            .filter(|&dir| {
                let (ex, ey, distance) = slide_end(grid, x, y, dir);
                let mut after = painted.clone();
                for idx in path_indices(grid, x, y, dir, distance) {
                    after[idx] = true;
                }
                Direction::ALL
                    .into_iter()
                    .any(|next| paints_new(grid, &after, ex, ey, next))
            })
            .collect();
        if !onward.is_empty() {
            options = onward;
        }
        let Some(&dir) = rng.pick(&options) else { break };

        let (ex, ey, distance) = slide_end(grid, x, y, dir);
        for idx in path_indices(grid, x, y, dir, distance) {
            painted[idx] = true;
        }
        x = ex;
        y = ey;
    }

    painted
}

/// Pick a random start, wall off whatever it cannot reach, trace a walk over
/// the rest and check the size.
fn finish_layout(mut grid: Grid, rng: &mut LevelRng, config: &DifficultyConfig) -> Option<MazeLayout> {
    let paths = grid.path_indices();
    let &start = rng.pick(&paths)?;
    let (start_x, start_y) = grid.coords(start);
    prune_unreachable(&mut grid, start_x, start_y);
    let painted = trace_walk(&grid, rng, config, start_x, start_y);
    for (cell, seen) in grid.cells.iter_mut().zip(painted) {
        if *cell == Cell::Path && !seen {
            *cell = Cell::Wall;
        }
    }

    if grid.path_count() < 2 * config.min_moves {
        return None;
    }

    Some(MazeLayout {
        grid,
        start_x,
        start_y,
    })
}

// ─── Serpentine ─────────────────────────────────────────────────────────────

/// A back-and-forth corridor that is solvable by construction.
///
/// Returns the layout together with its solution. Used as the last resort
/// when every seeded attempt has failed.
pub fn serpentine(width: usize, height: usize) -> Option<(MazeLayout, Vec<Direction>)> {
    if width < 4 || height < 3 {
        return None;
    }
    let mut grid = Grid::new(width, height);
    let (left, right) = (1, width - 2);
    let mut moves = Vec::new();
    let mut y = 1;
    let mut row = 0;

    loop {
        for x in left..=right {
            grid.set(x, y, Cell::Path);
        }
        moves.push(if row % 2 == 0 { Direction::Right } else { Direction::Left });

        if y + 2 > height - 2 {
            break;
        }
        let turn_x = if row % 2 == 0 { right } else { left };
        grid.set(turn_x, y + 1, Cell::Path);
        moves.push(Direction::Down);
        y += 2;
        row += 1;
    }

    Some((
        MazeLayout {
            grid,
            start_x: left,
            start_y: 1,
        },
        moves,
    ))
}

/// Serpentine folded into two bands: down the left half, across the bottom
/// row, back up the right half. Roughly doubles the moves of [`serpentine`]
/// on the same board. Needs at least a 7x5 grid.
pub fn folded_serpentine(width: usize, height: usize) -> Option<(MazeLayout, Vec<Direction>)> {
    if width < 7 || height < 5 {
        return None;
    }
    let mut grid = Grid::new(width, height);
    let (left, right) = (1, width - 2);
    // Last column of the left band; the column after it stays wall.
    let split = (width - 2) / 2;
    let rows: Vec<usize> = (1..height - 1).step_by(2).collect();
    let &last = rows.last()?;
    let mut moves = Vec::new();
    let mut x = left;

    for &y in &rows {
        if y != 1 {
            grid.set(x, y - 1, Cell::Path);
            moves.push(Direction::Down);
        }
        let end = if y == last { right } else { split };
        for cx in left..=end {
            grid.set(cx, y, Cell::Path);
        }
        if y == last {
            if x != left {
                moves.push(Direction::Left);
            }
            moves.push(Direction::Right);
            x = right;
        } else if x == left {
            moves.push(Direction::Right);
            x = split;
        } else {
            moves.push(Direction::Left);
            x = left;
        }
    }

    for &y in rows.iter().rev().skip(1) {
        grid.set(x, y + 1, Cell::Path);
        moves.push(Direction::Up);
        for cx in split + 2..=right {
            grid.set(cx, y, Cell::Path);
        }
        if x == right {
            moves.push(Direction::Left);
            x = split + 2;
        } else {
            moves.push(Direction::Right);
            x = right;
        }
    }

    Some((
        MazeLayout {
            grid,
            start_x: left,
            start_y: 1,
        },
        moves,
    ))
}
