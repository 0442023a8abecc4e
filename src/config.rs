//! Configuration for a [`crate::Dictionary`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_QUIZ_OPTIONS: usize = 4;

/// Top-level dictionary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Maximum number of history entries kept. `None` keeps everything.
    pub history_limit: Option<usize>,

    /// Whether searches append to the history log.
    pub record_history: bool,

    /// Answer options per quiz question. Values below 2 are raised to 2.
    pub quiz_options: usize,

    /// Where terms and the definition index are persisted.
    pub storage: StorageConfig,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            record_history: true,
            quiz_options: DEFAULT_QUIZ_OPTIONS,
            storage: StorageConfig::default(),
        }
    }
}

impl DictionaryConfig {
    pub fn quiz_options(&self) -> usize {
        self.quiz_options.max(2)
    }
}

/// File locations used by [`crate::FileStorage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Line-based term file.
    pub terms_path: PathBuf,

    /// JSON definition index.
    pub index_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            terms_path: PathBuf::from("data/slang.txt"),
            index_path: PathBuf::from("data/def_index.json"),
        }
    }
}

impl StorageConfig {
    /// Both files under `dir`, using the default file names.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            terms_path: dir.join("slang.txt"),
            index_path: dir.join("def_index.json"),
        }
    }
}
