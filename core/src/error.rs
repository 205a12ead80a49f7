use thiserror::Error;

use crate::{Side, TileIndex};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Tile index {index} is outside a board of {len} tiles")]
    InvalidIndex { index: TileIndex, len: TileIndex },
    #[error("Grid side {0} is not supported")]
    InvalidGridSize(Side),
    #[error("Board values do not form complete pairs")]
    InvalidBoard,
    #[error("Unknown difficulty tag {0:?}")]
    UnknownDifficulty(String),
    #[error("No game has been started")]
    NotStarted,
    #[error("Game already won, no new moves are accepted")]
    AlreadyEnded,
    #[error("Saved game is corrupt: {0}")]
    CorruptSnapshot(SnapshotDefect),
}

/// Reason a [`SavedGame`](crate::SavedGame) was refused on restore.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SnapshotDefect {
    #[error("tile arrays have different lengths")]
    LengthMismatch,
    #[error("board size does not fit the configured grid")]
    GridMismatch,
    #[error("numbers do not form complete pairs")]
    InvalidBoard,
    #[error("a matched tile is not flipped")]
    MatchedNotFlipped,
    #[error("more than two tiles are open")]
    TooManyOpen,
    #[error("two open tiles hold the same value")]
    UnresolvedMatch,
    #[error("every tile is already matched")]
    AlreadyWon,
    #[error("difficulty differs from the configured one")]
    DifficultyMismatch,
    #[error("time left exceeds the countdown budget")]
    TimeOutOfRange,
}

impl From<SnapshotDefect> for GameError {
    fn from(defect: SnapshotDefect) -> Self {
        Self::CorruptSnapshot(defect)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure reported by a storage backend; never fatal to gameplay.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O failure on key {key:?}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode value for key {key:?}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not decode value for key {key:?}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("value {value:?} under key {key:?} is not a number")]
    InvalidNumber { key: String, value: String },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = core::result::Result<T, StorageError>;
