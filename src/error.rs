//! Error types for the tile-search crate

use thiserror::Error;

/// Main error type for the tile-search crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("puzzle not valid: '{puzzle}' ({reason})")]
    InvalidPuzzle { puzzle: String, reason: String },

    #[error("unknown search type '{name}' (expected one of BFS, DFS, UCS, GS, A-star)")]
    UnknownStrategy { name: String },

    #[error("invalid tile counts '{counts}' (expected BLACKS,WHITES)")]
    InvalidTileCounts { counts: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_puzzle(puzzle: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPuzzle {
            puzzle: puzzle.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
