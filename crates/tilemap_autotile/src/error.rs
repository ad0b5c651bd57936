//! Error types for catalog loading, resolution and configuration

use crate::wang::WangId;
use thiserror::Error;

/// A malformed Wang set definition. Fatal at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Wang set '{0}' is defined more than once")]
    DuplicateSet(String),
    #[error("Wang set '{set}' declares color '{color}' more than once")]
    DuplicateColor { set: String, color: String },
    #[error("Wang set '{set}' declares {count} colors, at most {max} are supported")]
    TooManyColors { set: String, count: usize, max: usize },
    #[error("Wang set '{set}' tile {tile_id} uses color {color}, but only {declared} colors are declared")]
    UndeclaredColor {
        set: String,
        tile_id: u32,
        color: u8,
        declared: usize,
    },
    #[error("Wang set '{set}' assigns more than one wang id to tile {tile_id}")]
    DuplicateTile { set: String, tile_id: u32 },
    #[error("Wang set '{set}': probability of {subject} must be finite and >= 0, got {value}")]
    InvalidProbability {
        set: String,
        subject: String,
        value: f32,
    },
    #[error("Wang set '{set}' priority list is invalid: {reason}")]
    InvalidPriority { set: String, reason: String },
    #[error("Wang set '{set}' references tile {tile_id}, which is not in tileset '{tileset}'")]
    UnknownTile {
        set: String,
        tile_id: u32,
        tileset: String,
    },
}

/// No tile in the set satisfies a cell's constraint. Recoverable, reported per cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no tile in wang set '{set}' matches {wang_id}")]
pub struct NoMatchError {
    pub set: String,
    pub wang_id: WangId,
}

/// Errors produced while resolving tiles
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutotileError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    NoMatch(#[from] NoMatchError),
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: u64,
        y: u64,
        width: u32,
        height: u32,
    },
    #[error("unknown wang set '{0}'")]
    UnknownWangSet(String),
    #[error("grid is {actual_width}x{actual_height}, autotiler tracks {width}x{height}")]
    GridSizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Errors that can occur when loading an [`AutotileConfig`](crate::AutotileConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
