//! Error types surfaced by the core.
//!
//! Collision failures are never errors (the move is simply not committed) and
//! top-out is a normal terminal state. Only malformed configuration and
//! persistence failures escape as `Err`.

use crate::types::Orientation;

/// Configuration rejected before any tick runs
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("piece table is empty")]
    EmptyPieceTable,

    #[error("piece table holds {0} pieces, at most 255 are supported")]
    TooManyPieces(usize),

    #[error("board size {width}x{height} is outside {min}..={max}")]
    BoardSize {
        width: u8,
        height: u8,
        min: u8,
        max: u8,
    },

    #[error("piece '{alias}' ({orientation:?}): {reason}")]
    MalformedShape {
        alias: char,
        orientation: Orientation,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    ZeroTiming(&'static str),

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistence collaborator failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score store I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored score for '{label}' is unreadable: {reason}")]
    Corrupt { label: String, reason: String },
}
