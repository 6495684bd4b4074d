//! High-score persistence: one non-negative integer in a plain text file.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{GameError, Result};

const DEFAULT_FILE_NAME: &str = ".alien_invasion_highscore";

#[derive(Clone, Debug)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HighScoreStore { path: path.into() }
    }

    /// `~/.alien_invasion_highscore`, or the working directory without a home.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored high score; a missing or garbled file counts as 0.
    pub fn load(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse().unwrap_or_else(|_| {
                debug!(path = %self.path.display(), "unparsable high score, using 0");
                0
            }),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no high score file, using 0");
                0
            }
        }
    }

    pub fn save(&self, score: u32) -> Result<()> {
        std::fs::write(&self.path, score.to_string()).map_err(|source| GameError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Best score seen so far, backed by a `HighScoreStore`.
#[derive(Clone, Debug)]
pub struct ScoreTracker {
    store: HighScoreStore,
    best: u32,
}

impl ScoreTracker {
    pub fn open(store: HighScoreStore) -> Self {
        let best = store.load();
        ScoreTracker { store, best }
    }

    pub fn high_score(&self) -> u32 {
        self.best
    }

    /// Record a finished round's score. Writes the file only when the score
    /// beats the best so far; returns whether it did. A failed write is
    /// logged and otherwise ignored.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        info!(score, "new high score");
        if let Err(e) = self.store.save(score) {
            warn!(error = %e, "could not persist high score");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_uses_dotfile_name() {
        let path = HighScoreStore::default_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(DEFAULT_FILE_NAME));
    }
}
