use std::collections::HashMap;

use log::debug;
use rand::{SeedableRng, rngs::StdRng, seq::IteratorRandom};
use sha2::{Digest, Sha256};

use super::{
    index::InvertedIndex,
    types::{IndexSnapshot, LexicalStore, Term},
};

impl LexicalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose random picks are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::default()
        }
    }

    /// Load terms in order; later duplicates of a key replace earlier ones.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut store = Self::default();
        store.extend(terms);
        store
    }

    pub fn extend(&mut self, terms: impl IntoIterator<Item = Term>) {
        for term in terms {
            self.add(term);
        }
    }

    /// Insert or replace the term under its key. Returns the replaced term, if any.
    ///
    /// The replaced entry's tokens leave the index before the new ones go in.
    pub fn add(&mut self, term: Term) -> Option<Term> {
        let previous = self.terms.remove(term.key());
        if let Some(previous) = &previous {
            self.index.remove_term(previous);
        }
        self.index.add_term(&term);
        self.terms.insert(term.key().to_string(), term);
        previous
    }

    /// Replace the term stored under `old_key` with `new_term`, which may carry a
    /// different key. Returns false without touching anything if `old_key` is absent.
    pub fn edit(&mut self, old_key: &str, new_term: Term) -> bool {
        let Some(old) = self.terms.remove(old_key) else {
            return false;
        };
        self.index.remove_term(&old);

        // renaming onto a different existing key replaces that term as well
        if let Some(displaced) = self.terms.remove(new_term.key()) {
            self.index.remove_term(&displaced);
        }

        self.index.add_term(&new_term);
        self.terms.insert(new_term.key().to_string(), new_term);
        true
    }

    /// Remove the term stored under exactly `key`.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.terms.remove(key) {
            Some(removed) => {
                self.index.remove_term(&removed);
                true
            }
            None => false,
        }
    }

    /// Uniformly pick one term. Each call draws again.
    pub fn get_random(&mut self) -> Option<&Term> {
        let key = self.terms.keys().choose(&mut self.rng)?.clone();
        self.terms.get(&key)
    }

    /// Deep-copy the current terms as the baseline for [`Self::reset_to_original`].
    /// Any earlier baseline is discarded.
    pub fn backup_original(&mut self) {
        self.snapshot = Some(copy_terms(&self.terms));
    }

    /// Restore a fresh copy of the baseline and rebuild the index from it.
    /// Returns false (and does nothing) if no baseline was taken.
    pub fn reset_to_original(&mut self) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return false;
        };
        self.terms = copy_terms(snapshot);
        self.rebuild_index();
        true
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Recompute the index from the term map.
    pub fn rebuild_index(&mut self) {
        self.index.rebuild(self.terms.values());
        debug!(
            "rebuilt definition index: {} terms, {} tokens",
            self.terms.len(),
            self.index.len()
        );
    }

    /// Install an index loaded from storage. The caller vouches that it matches
    /// the current term map.
    pub fn set_index(&mut self, index: InvertedIndex) {
        self.index = index;
    }

    /// Empty the terms and the index. The baseline survives.
    pub fn clear(&mut self) {
        self.terms.clear();
        self.index.clear();
    }

    pub fn get(&self, key: &str) -> Option<&Term> {
        self.terms.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.terms.contains_key(key)
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Hex SHA-256 over every key and definition, taken in key order.
    ///
    /// Equal term maps give equal fingerprints regardless of insertion order.
    pub fn fingerprint(&self) -> String {
        let mut terms: Vec<&Term> = self.terms.values().collect();
        terms.sort_by(|a, b| a.key().cmp(b.key()));

        let mut hasher = Sha256::new();
        hasher.update((terms.len() as u64).to_le_bytes());
        for term in terms {
            hasher.update((term.key().len() as u64).to_le_bytes());
            hasher.update(term.key().as_bytes());
            hasher.update((term.definitions().len() as u64).to_le_bytes());
            for definition in term.definitions() {
                hasher.update((definition.len() as u64).to_le_bytes());
                hasher.update(definition.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }

    /// The index snapshot stamped with the current [`LexicalStore::fingerprint`].
    pub fn index_snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            fingerprint: self.fingerprint(),
            ..self.index.to_snapshot()
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn copy_terms(terms: &HashMap<String, Term>) -> HashMap<String, Term> {
    terms
        .iter()
        .map(|(key, term)| (key.clone(), term.clone()))
        .collect()
}
