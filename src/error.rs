//! Error types for startup and persistence.
//!
//! Gameplay itself never fails; only configuration loading, terminal
//! sizing and the high-score file can produce a `GameError`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `GameConfig`.
    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config parsed but describes an unplayable game.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The play area cannot hold the ship and one fleet column.
    #[error("terminal too small: need at least {min_cols}x{min_rows}, got {cols}x{rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;
