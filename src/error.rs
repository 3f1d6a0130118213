//! Caller-facing error types.
//!
//! Generation-time failures (a strategy giving up, the solver running out of
//! depth, a quality rejection) never surface here: the orchestrator absorbs
//! them by retrying. These errors cover bad input crossing the API.

use thiserror::Error;

use crate::types::Direction;

/// Errors reported by the maze core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MazeError {
    /// Mode string was neither `thinking` nor `relaxing`.
    #[error("unknown game mode: {0}")]
    UnknownMode(String),

    /// Integer code does not name a cell state.
    #[error("unknown cell code: {0}")]
    UnknownCell(u8),

    /// Grid buffer length does not match `width * height`.
    #[error("grid has {actual} cells, expected {width}x{height}")]
    GridSize {
        width: usize,
        height: usize,
        actual: usize,
    },

    /// Position lies outside the grid or on a wall.
    #[error("start ({x}, {y}) is not a path cell")]
    InvalidStart { x: usize, y: usize },

    /// A replayed move could not slide at all.
    #[error("move {step} ({direction:?}) is blocked")]
    BlockedMove { step: usize, direction: Direction },

    /// Tier table does not cover the level range contiguously.
    #[error("tier '{name}' starts at level {start}, expected {expected}")]
    TierGap {
        name: String,
        start: u32,
        expected: u32,
    },

    /// Tier table ends before the highest supported level.
    #[error("tiers end at level {end}, expected {expected}")]
    TierCoverage { end: u32, expected: u32 },

    /// Generator settings are out of range.
    #[error("invalid generator setting {field}: {reason}")]
    InvalidSettings {
        field: &'static str,
        reason: String,
    },
}
