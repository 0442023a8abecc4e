use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{error::DictionaryError, index::InvertedIndex};

pub const INDEX_SNAPSHOT_VERSION: u32 = 1;

/// A slang key with its ordered definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    key: String,
    definitions: Vec<String>,
}

impl Term {
    /// Build a term, trimming the key. Fails if the key is blank.
    pub fn new<K, I, D>(key: K, definitions: I) -> Result<Self, DictionaryError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(DictionaryError::EmptyKey);
        }
        Ok(Self {
            key: key.to_string(),
            definitions: definitions.into_iter().map(Into::into).collect(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn definitions(&self) -> &[String] {
        &self.definitions
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.key, self.definitions)
    }

    /// Same definitions under another key.
    pub fn renamed(&self, key: &str) -> Result<Self, DictionaryError> {
        Self::new(key, self.definitions.iter().cloned())
    }

    pub fn replace_definitions(&mut self, definitions: Vec<String>) {
        self.definitions = definitions;
    }

    /// Append every definition not already present. Returns how many were appended.
    pub fn merge_definitions<I>(&mut self, definitions: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut appended = 0;
        for definition in definitions {
            if !self.definitions.contains(&definition) {
                self.definitions.push(definition);
                appended += 1;
            }
        }
        appended
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.key, self.definitions.join(" | "))
    }
}

/// Which lookup produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    ByWord,
    ByDefinition,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKind::ByWord => f.write_str("WORD"),
            SearchKind::ByDefinition => f.write_str("DEFINITION"),
        }
    }
}

/// One past query and the keys it matched at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    query: String,
    kind: SearchKind,
    result_keys: Vec<String>,
}

impl HistoryEntry {
    pub fn new(query: impl Into<String>, kind: SearchKind, result_keys: Vec<String>) -> Self {
        Self {
            query: query.into(),
            kind,
            result_keys,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn result_keys(&self) -> &[String] {
        &self.result_keys
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result_keys.is_empty() {
            write!(f, "{}: \"{}\" -> (no results)", self.kind, self.query)
        } else {
            write!(
                f,
                "{}: \"{}\" -> {}",
                self.kind,
                self.query,
                self.result_keys.join(", ")
            )
        }
    }
}

/// Policy for adding a key that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOption {
    /// Replace the existing definitions with the new ones.
    Overwrite,
    /// Keep existing definitions and append new, non-duplicate ones.
    Duplicate,
    /// Leave the existing entry untouched.
    Cancel,
}

/// Result of an add request through [`crate::Dictionary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Overwritten,
    Duplicated,
    /// The key exists and no overwrite/duplicate policy was given.
    Exists,
    /// Input was rejected; nothing changed.
    Failed,
}

/// Persisted form of the inverted index: token -> sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    #[serde(default)]
    pub version: u32,
    /// [`LexicalStore::fingerprint`] of the terms the index was built from.
    /// Empty when the snapshot was taken from a bare index.
    #[serde(default)]
    pub fingerprint: String,
    pub buckets: BTreeMap<String, Vec<String>>,
}

/// Term map plus the definition index derived from it.
#[derive(Debug)]
pub struct LexicalStore {
    pub(crate) terms: HashMap<String, Term>,
    pub(crate) index: InvertedIndex,
    pub(crate) snapshot: Option<HashMap<String, Term>>,
    pub(crate) rng: StdRng,
}

impl Default for LexicalStore {
    fn default() -> Self {
        Self {
            terms: HashMap::new(),
            index: InvertedIndex::default(),
            snapshot: None,
            rng: StdRng::from_entropy(),
        }
    }
}
