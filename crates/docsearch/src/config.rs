use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::search::default_worker_count;

pub const DEFAULT_EXTENSION: &str = "txt";

/// Search settings read from a JSON file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Extension of the files to search, without the leading dot.
    pub extension: String,
    pub recursive: bool,
    /// Worker threads; unset means one per available CPU.
    pub workers: Option<usize>,
    /// Regex matched against file names to skip.
    pub exclude: Option<String>,
    pub progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            recursive: false,
            workers: None,
            exclude: None,
            progress: true,
        }
    }
}

impl SearchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|error| {
            SearchError::Config(format!(
                "failed to read search config {}: {error}",
                path.display()
            ))
        })?;
        serde_json::from_str(&data).map_err(|error| {
            SearchError::Config(format!(
                "failed to parse search config {}: {error}",
                path.display()
            ))
        })
    }

    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(workers) if workers > 0 => workers,
            _ => default_worker_count(),
        }
    }
}
