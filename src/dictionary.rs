use log::{info, warn};

use super::{
    config::DictionaryConfig,
    error::Result,
    history::HistoryLog,
    index::InvertedIndex,
    persist::{Storage, format},
    quiz::{QuizKind, QuizQuestion},
    types::{AddOption, AddOutcome, HistoryEntry, LexicalStore, SearchKind, Term},
};

/// Split caller input into definitions on `|` or line breaks, trimming pieces
/// and dropping blanks.
pub fn parse_definitions(raw: &str) -> Vec<String> {
    format::split_definitions(raw, &['|', '\n', '\r'])
}

/// The caller-facing dictionary: a [`LexicalStore`], its search history and a
/// storage backend written after every successful mutation.
///
/// Storage failures never undo an in-memory change; they are logged and kept
/// in [`Dictionary::last_persist_error`].
#[derive(Debug)]
pub struct Dictionary<S: Storage> {
    store: LexicalStore,
    history: HistoryLog,
    storage: S,
    config: DictionaryConfig,
    last_persist_error: Option<String>,
}

impl<S: Storage> Dictionary<S> {
    /// An empty dictionary that writes to `storage` but has not read from it.
    pub fn new(storage: S, config: DictionaryConfig) -> Self {
        Self::with_store(LexicalStore::new(), storage, config)
    }

    pub fn with_store(store: LexicalStore, storage: S, config: DictionaryConfig) -> Self {
        Self {
            store,
            history: HistoryLog::with_limit(config.history_limit),
            storage,
            config,
            last_persist_error: None,
        }
    }

    /// Load terms and index from `storage`, then take the reset baseline.
    pub fn open(storage: S, config: DictionaryConfig) -> Result<Self> {
        Self::open_with_store(LexicalStore::new(), storage, config)
    }

    /// Like [`Dictionary::open`], loading into a caller-built (e.g. seeded) store.
    pub fn open_with_store(
        mut store: LexicalStore,
        storage: S,
        config: DictionaryConfig,
    ) -> Result<Self> {
        store.clear();
        store.extend(storage.load_terms()?);
        let mut dictionary = Self::with_store(store, storage, config);
        let loaded = dictionary.load_or_build_index();
        dictionary.store.backup_original();
        info!(
            "opened dictionary with {} terms (index {})",
            dictionary.store.len(),
            if loaded { "loaded" } else { "rebuilt" }
        );
        Ok(dictionary)
    }

    /// Use the persisted index if it is usable, otherwise rebuild and persist it.
    /// Returns true if the persisted index was used.
    ///
    /// A persisted index is usable only if its version is current and its
    /// fingerprint equals the fingerprint of the loaded terms.
    pub fn load_or_build_index(&mut self) -> bool {
        let snapshot = match self.storage.load_index() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("failed to read definition index, rebuilding: {err}");
                None
            }
        };

        let fingerprint = self.store.fingerprint();
        let usable = snapshot.and_then(|snapshot| {
            let built_from_terms = snapshot.fingerprint == fingerprint;
            let index = InvertedIndex::from_snapshot(snapshot);
            if index.is_none() {
                warn!("definition index has an unsupported version, rebuilding");
                return None;
            }
            if !built_from_terms {
                warn!("definition index was built from other terms, rebuilding");
                return None;
            }
            index
        });

        match usable {
            Some(index) if index.references_only(|key| self.store.contains_key(key)) => {
                self.store.set_index(index);
                true
            }
            other => {
                if other.is_some() {
                    warn!("definition index refers to unknown terms, rebuilding");
                }
                self.store.rebuild_index();
                self.save_index();
                false
            }
        }
    }

    /// Look a key up (exact, then ignoring case) and record the query.
    pub fn search_by_word(&mut self, word: &str) -> Option<&Term> {
        let found = self.store.find_by_key(word);
        if self.config.record_history {
            let keys = found.iter().map(|term| term.key().to_string()).collect();
            self.history.record(word, SearchKind::ByWord, keys);
        }
        found
    }

    /// Terms whose definitions contain `keyword`, recorded in history.
    pub fn search_by_definition(&mut self, keyword: &str) -> Vec<&Term> {
        let found = self.store.find_by_definition_substring(keyword);
        if self.config.record_history {
            let keys = found.iter().map(|term| term.key().to_string()).collect();
            self.history.record(keyword, SearchKind::ByDefinition, keys);
        }
        found
    }

    /// Add a new key. An existing key (in any case) is reported as
    /// [`AddOutcome::Exists`] and left alone.
    pub fn add(&mut self, key: &str, definitions_raw: &str) -> AddOutcome {
        self.add_with(key, definitions_raw, None)
    }

    /// Add a key, resolving a clash with an existing entry through `option`.
    pub fn add_with_option(
        &mut self,
        key: &str,
        definitions_raw: &str,
        option: AddOption,
    ) -> AddOutcome {
        self.add_with(key, definitions_raw, Some(option))
    }

    fn add_with(&mut self, key: &str, definitions_raw: &str, option: Option<AddOption>) -> AddOutcome {
        let Some((key, definitions)) = validate_input(key, definitions_raw) else {
            return AddOutcome::Failed;
        };

        let Some(existing) = self.store.find_by_key(&key) else {
            let Ok(term) = Term::new(&key, definitions) else {
                return AddOutcome::Failed;
            };
            self.store.add(term);
            self.persist();
            return AddOutcome::Added;
        };

        let mut updated = existing.clone();
        let outcome = match option {
            Some(AddOption::Overwrite) => {
                updated.replace_definitions(definitions);
                AddOutcome::Overwritten
            }
            Some(AddOption::Duplicate) => {
                updated.merge_definitions(definitions);
                AddOutcome::Duplicated
            }
            Some(AddOption::Cancel) | None => return AddOutcome::Exists,
        };
        self.store.add(updated);
        self.persist();
        outcome
    }

    /// Replace the entry found for `old_key` with `new_key` and new definitions.
    /// Renames when the keys differ. False if nothing matched or input is blank.
    pub fn edit(&mut self, old_key: &str, new_key: &str, definitions_raw: &str) -> bool {
        let Some((new_key, definitions)) = validate_input(new_key, definitions_raw) else {
            return false;
        };
        let Some(stored_key) = self
            .store
            .find_by_key(old_key)
            .map(|term| term.key().to_string())
        else {
            return false;
        };
        let Ok(term) = Term::new(&new_key, definitions) else {
            return false;
        };

        let edited = self.store.edit(&stored_key, term);
        if edited {
            self.persist();
        }
        edited
    }

    /// Delete the entry stored under exactly `key`.
    pub fn delete(&mut self, key: &str) -> bool {
        let deleted = self.store.delete(key);
        if deleted {
            self.persist();
        }
        deleted
    }

    pub fn random(&mut self) -> Option<&Term> {
        self.store.get_random()
    }

    pub fn quiz(&mut self, kind: QuizKind) -> Option<QuizQuestion> {
        self.store.quiz_question(kind, self.config.quiz_options())
    }

    pub fn backup(&mut self) {
        self.store.backup_original();
    }

    /// Restore the baseline taken at open (or the last [`Dictionary::backup`]).
    pub fn reset(&mut self) -> bool {
        let restored = self.store.reset_to_original();
        if restored {
            self.persist();
        }
        restored
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.entries()
    }

    pub fn history_log(&self) -> &HistoryLog {
        &self.history
    }

    pub fn delete_history_entry(&mut self, position: usize) -> bool {
        self.history.delete_at(position)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn all_terms(&self) -> impl Iterator<Item = &Term> {
        self.store.terms()
    }

    pub fn store(&self) -> &LexicalStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    /// Message of the most recent failed save, cleared by the next successful one.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Save terms and index. Returns false if either write failed.
    pub fn persist(&mut self) -> bool {
        let mut terms: Vec<&Term> = self.store.terms().collect();
        terms.sort_by(|a, b| a.key().cmp(b.key()));
        if let Err(err) = self.storage.save_terms(&terms) {
            warn!("failed to save terms, keeping in-memory changes: {err}");
            self.last_persist_error = Some(err.to_string());
            return false;
        }
        self.save_index()
    }

    fn save_index(&mut self) -> bool {
        match self.storage.save_index(&self.store.index_snapshot()) {
            Ok(()) => {
                self.last_persist_error = None;
                true
            }
            Err(err) => {
                warn!("failed to save definition index: {err}");
                self.last_persist_error = Some(err.to_string());
                false
            }
        }
    }
}

/// Trimmed key and parsed definitions, or `None` if either is unusable.
fn validate_input(key: &str, definitions_raw: &str) -> Option<(String, Vec<String>)> {
    let key = key.trim();
    if key.is_empty() || format::validate_key(key).is_err() {
        return None;
    }
    let definitions = parse_definitions(definitions_raw);
    if definitions.is_empty() {
        return None;
    }
    Some((key.to_string(), definitions))
}
