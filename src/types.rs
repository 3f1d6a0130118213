//! Core data types for the maze generator and solver.
//!
//! All grids use flat `Vec` storage in row-major layout:
//! `cells[y * width + x]` is the cell at column `x`, row `y`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// State of a single grid cell.
///
/// Generation only ever emits `Wall` and `Path`; `Painted` exists while a
/// level is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Cell {
    Wall = 0,
    Path = 1,
    Painted = 2,
}

impl Cell {
    /// Anything but a wall can be slid over.
    #[inline(always)]
    pub fn is_open(self) -> bool {
        self != Cell::Wall
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        cell as u8
    }
}

impl TryFrom<u8> for Cell {
    type Error = MazeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Cell::Wall),
            1 => Ok(Cell::Path),
            2 => Ok(Cell::Painted),
            other => Err(MazeError::UnknownCell(other)),
        }
    }
}

/// One of the four slide directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed iteration order. The solver relies on it for determinism.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector `(dx, dy)`; `y` grows downwards.
    #[inline(always)]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Whether the direction runs along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Game mode. Each mode has its own tier table and seed space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Tactical puzzles with real branching decisions.
    Thinking,
    /// Flow puzzles biased towards layouts without dead ends.
    Relaxing,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Thinking => "thinking",
            Mode::Relaxing => "relaxing",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thinking" => Ok(Mode::Thinking),
            "relaxing" => Ok(Mode::Relaxing),
            other => Err(MazeError::UnknownMode(other.to_string())),
        }
    }
}

/// The maze board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    #[serde(rename = "grid")]
    pub cells: Vec<Cell>,
}

impl Grid {
    /// A grid made entirely of walls.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Cell::Wall)
    }

    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    /// Build from raw cell codes, checking the buffer length.
    pub fn from_codes(width: usize, height: usize, codes: &[u8]) -> Result<Self, MazeError> {
        if codes.len() != width * height {
            return Err(MazeError::GridSize {
                width,
                height,
                actual: codes.len(),
            });
        }
        let cells = codes
            .iter()
            .map(|&c| Cell::try_from(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse a picture where `#` is a wall and anything else is a path.
    /// Rows must all have the same length.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let cells = rows
            .iter()
            .flat_map(|row| {
                row.bytes()
                    .map(|b| if b == b'#' { Cell::Wall } else { Cell::Path })
            })
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Decode a flat index back to `(x, y)`.
    #[inline(always)]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y * self.width + x] = cell;
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// True for cells at least one step away from the border.
    #[inline(always)]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x >= 1 && y >= 1 && x + 1 < self.width && y + 1 < self.height
    }

    /// Neighbour one step in `dir`, if it is inside the grid.
    #[inline(always)]
    pub fn step(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.in_bounds(nx, ny).then_some((nx, ny))
    }

    /// Whether `(x, y)` is in bounds and not a wall.
    #[inline(always)]
    pub fn is_open(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.get(x, y).is_open()
    }

    /// Count of cells in state `Path`.
    pub fn path_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Path).count()
    }

    /// Flat indices of all `Path` cells, in row-major order.
    pub fn path_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == Cell::Path)
            .map(|(i, _)| i)
            .collect()
    }

    /// True when every cell on the outer ring is a wall.
    pub fn has_wall_margin(&self) -> bool {
        if self.width == 0 || self.height == 0 {
            return true;
        }
        (0..self.width).all(|x| self.get(x, 0) == Cell::Wall && self.get(x, self.height - 1) == Cell::Wall)
            && (0..self.height)
                .all(|y| self.get(0, y) == Cell::Wall && self.get(self.width - 1, y) == Cell::Wall)
    }

    /// Raw cell codes, as consumed by the renderer.
    pub fn to_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|&c| u8::from(c)).collect()
    }
}

/// Immutable difficulty parameters for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    pub name: &'static str,
    pub grid_size: usize,
    pub min_moves: usize,
    pub max_moves: usize,
}

/// A contiguous range of level ids sharing one [`DifficultyConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyTier {
    pub name: String,
    pub start_level: u32,
    pub end_level: u32,
}

/// A generated level, as handed to the render and progress layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub id: u32,
    pub name: String,
    #[serde(flatten)]
    pub board: Grid,
    pub start_x: usize,
    pub start_y: usize,
    pub target_moves: usize,
    pub color_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<Direction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl LevelData {
    pub fn width(&self) -> usize {
        self.board.width
    }

    pub fn height(&self) -> usize {
        self.board.height
    }

    /// Give the level a new id, updating the derived name and colour.
    pub fn relabel(&mut self, id: u32) {
        self.id = id;
        self.name = level_name(id);
        self.color_index = color_index(id);
    }
}

/// Number of level colours in the renderer's palette.
pub const LEVEL_COLOR_COUNT: usize = 10;

pub fn level_name(id: u32) -> String {
    format!("Level {id}")
}

pub fn color_index(id: u32) -> usize {
    (id.saturating_sub(1) as usize) % LEVEL_COLOR_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_get_set() {
        let mut g = Grid::new(10, 8);
        g.set(3, 5, Cell::Path);
        assert_eq!(g.get(3, 5), Cell::Path);
        assert_eq!(g.get(0, 0), Cell::Wall);
        assert_eq!(g.cells[5 * 10 + 3], Cell::Path);
        assert_eq!(g.coords(g.index(3, 5)), (3, 5));
    }

    #[test]
    fn test_step_clips_to_bounds() {
        let g = Grid::new(3, 3);
        assert_eq!(g.step(0, 0, Direction::Up), None);
        assert_eq!(g.step(0, 0, Direction::Left), None);
        assert_eq!(g.step(2, 2, Direction::Right), None);
        assert_eq!(g.step(1, 1, Direction::Down), Some((1, 2)));
    }

    #[test]
    fn test_from_rows_and_margin() {
        let g = Grid::from_rows(&["#####", "#...#", "#####"]);
        assert_eq!((g.width, g.height), (5, 3));
        assert_eq!(g.path_count(), 3);
        assert!(g.has_wall_margin());

        let open = Grid::from_rows(&["...", "###"]);
        assert!(!open.has_wall_margin());
    }

    #[test]
    fn test_from_codes_rejects_bad_input() {
        assert_eq!(
            Grid::from_codes(2, 2, &[0, 1, 0]),
            Err(MazeError::GridSize { width: 2, height: 2, actual: 3 })
        );
        assert_eq!(Grid::from_codes(1, 1, &[7]), Err(MazeError::UnknownCell(7)));
        let g = Grid::from_codes(2, 1, &[0, 1]).unwrap();
        assert_eq!(g.to_codes(), vec![0, 1]);
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("thinking".parse::<Mode>(), Ok(Mode::Thinking));
        assert_eq!("relaxing".parse::<Mode>(), Ok(Mode::Relaxing));
        assert!(matches!("zen".parse::<Mode>(), Err(MazeError::UnknownMode(_))));
    }

    #[test]
    fn test_level_data_serializes_flat() {
        let level = LevelData {
            id: 3,
            name: level_name(3),
            board: Grid::from_rows(&["###", "#.#", "###"]),
            start_x: 1,
            start_y: 1,
            target_moves: 0,
            color_index: color_index(3),
            solution: Some(vec![Direction::Left]),
            difficulty: Some("Easy".to_string()),
        };
        let json = serde_json::to_value(&level).unwrap();
        assert_eq!(json["width"], 3);
        assert_eq!(json["startX"], 1);
        assert_eq!(json["colorIndex"], 2);
        assert_eq!(json["grid"][4], 1);
        assert_eq!(json["solution"][0], "LEFT");

        let back: LevelData = serde_json::from_value(json).unwrap();
        assert_eq!(back, level);
    }

    #[test]
    fn test_color_index_wraps() {
        assert_eq!(color_index(1), 0);
        assert_eq!(color_index(10), 9);
        assert_eq!(color_index(11), 0);
    }
}
