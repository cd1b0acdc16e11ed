use crate::types::{Coord, Geometry};
use thiserror::Error;

/// Rejected match configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board must be at least 1x1, got {width}x{height}")]
    InvalidGeometry { width: u8, height: u8 },

    #[error("Play clock must be a positive number of seconds")]
    InvalidPlayClock,

    #[error("Unknown role token: {0:?} (expected \"white\" or \"black\")")]
    UnknownRole(String),

    #[error("Starting position {coord} is outside the {geometry} board")]
    PositionOutOfBounds { coord: Coord, geometry: Geometry },

    #[error("Square {0} is listed more than once in the starting positions")]
    OverlappingPositions(Coord),
}

/// Malformed action text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("Expected \"noop\" or \"(play x1 y1 x2 y2)\", got {0:?}")]
    InvalidFormat(String),

    #[error("Expected 4 coordinates, got {0}")]
    WrongArity(usize),

    #[error("Invalid coordinate: {0:?}")]
    InvalidNumber(String),
}

/// Malformed board diagram.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("Diagram has no rows")]
    Empty,

    #[error("Row {row} has {found} squares, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Diagram side of {0} squares exceeds 255")]
    TooLarge(usize),

    #[error("Invalid square character: '{0}'")]
    InvalidSquare(char),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
