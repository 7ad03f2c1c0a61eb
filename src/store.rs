//! Best scores on disk: one JSON number per session label.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{ScoreStore, StoreError};

/// Stores `<dir>/<label>.json` holding a single JSON number
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    dir: PathBuf,
}

impl JsonScoreStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `label`. Characters outside `[A-Za-z0-9_-]` are replaced
    /// so a label can never escape the directory.
    pub fn path_for(&self, label: &str) -> PathBuf {
        let mut name: String = label
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if name.is_empty() {
            name.push('_');
        }
        self.dir.join(format!("{name}.json"))
    }
}

impl ScoreStore for JsonScoreStore {
    fn load_best(&self, label: &str) -> Result<u32, StoreError> {
        let path = self.path_for(label);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(text.trim()).map_err(|err| StoreError::Corrupt {
            label: label.to_string(),
            reason: err.to_string(),
        })
    }

    fn save_best(&mut self, label: &str, score: u32) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(label);
        let text = serde_json::to_string(&score).map_err(|err| StoreError::Corrupt {
            label: label.to_string(),
            reason: err.to_string(),
        })?;
        fs::write(&path, text)?;
        debug!(path = %path.display(), score, "best score saved");
        Ok(())
    }
}
