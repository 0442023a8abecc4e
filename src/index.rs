use std::collections::{HashMap, HashSet};

use super::{
    tokenizer::tokenize,
    types::{INDEX_SNAPSHOT_VERSION, IndexSnapshot, Term},
};

/// How a query token has to line up with an indexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAnchor {
    /// Indexed token equals the query token.
    Exact,
    /// Indexed token starts with the query token.
    Prefix,
    /// Indexed token ends with the query token.
    Suffix,
    /// Indexed token contains the query token anywhere.
    Infix,
}

impl TokenAnchor {
    /// Anchor for a query token given whether the query text continues past it.
    pub fn from_bounds(bounded_left: bool, bounded_right: bool) -> Self {
        match (bounded_left, bounded_right) {
            (true, true) => TokenAnchor::Exact,
            (true, false) => TokenAnchor::Prefix,
            (false, true) => TokenAnchor::Suffix,
            (false, false) => TokenAnchor::Infix,
        }
    }

    fn matches(&self, indexed: &str, token: &str) -> bool {
        match self {
            TokenAnchor::Exact => indexed == token,
            TokenAnchor::Prefix => indexed.starts_with(token),
            TokenAnchor::Suffix => indexed.ends_with(token),
            TokenAnchor::Infix => indexed.contains(token),
        }
    }
}

/// Token -> keys of the terms whose definitions contain that token.
///
/// Buckets are never left empty: removing the last key drops the token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    buckets: HashMap<String, HashSet<String>>,
}

impl InvertedIndex {
    pub fn build<'a>(terms: impl IntoIterator<Item = &'a Term>) -> Self {
        let mut index = Self::default();
        for term in terms {
            index.add_term(term);
        }
        index
    }

    pub fn add_term(&mut self, term: &Term) {
        for definition in term.definitions() {
            for token in tokenize(definition) {
                self.buckets
                    .entry(token)
                    .or_default()
                    .insert(term.key().to_string());
            }
        }
    }

    pub fn remove_term(&mut self, term: &Term) {
        for definition in term.definitions() {
            for token in tokenize(definition) {
                if let Some(keys) = self.buckets.get_mut(&token) {
                    keys.remove(term.key());
                    if keys.is_empty() {
                        self.buckets.remove(&token);
                    }
                }
            }
        }
    }

    pub fn update_term(&mut self, old: &Term, new: &Term) {
        self.remove_term(old);
        self.add_term(new);
    }

    /// Drop every bucket and index `terms` from scratch.
    pub fn rebuild<'a>(&mut self, terms: impl IntoIterator<Item = &'a Term>) {
        self.buckets.clear();
        for term in terms {
            self.add_term(term);
        }
    }

    /// Keys present in the bucket of every token.
    ///
    /// Empty input or any missing bucket yields an empty set. Intersection starts
    /// from the smallest bucket and stops as soon as the running set empties.
    pub fn intersect_candidates<S: AsRef<str>>(&self, tokens: &[S]) -> HashSet<String> {
        if tokens.is_empty() {
            return HashSet::new();
        }

        let mut buckets = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.buckets.get(token.as_ref()) {
                Some(keys) if !keys.is_empty() => buckets.push(keys),
                _ => return HashSet::new(),
            }
        }
        buckets.sort_by_key(|keys| keys.len());

        let mut buckets = buckets.into_iter();
        let Some(smallest) = buckets.next() else {
            return HashSet::new();
        };
        let mut result = smallest.clone();
        for keys in buckets {
            result.retain(|key| keys.contains(key));
            if result.is_empty() {
                break;
            }
        }
        result
    }

    /// Union of the buckets whose token lines up with `token` under `anchor`.
    pub fn expand_candidates(&self, token: &str, anchor: TokenAnchor) -> HashSet<String> {
        if anchor == TokenAnchor::Exact {
            return self.buckets.get(token).cloned().unwrap_or_default();
        }

        let mut result = HashSet::new();
        for (indexed, keys) in &self.buckets {
            if anchor.matches(indexed, token) {
                result.extend(keys.iter().cloned());
            }
        }
        result
    }

    pub fn bucket(&self, token: &str) -> Option<&HashSet<String>> {
        self.buckets.get(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.buckets.iter().map(|(token, keys)| (token.as_str(), keys))
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// True if every key referenced by a bucket satisfies `known`.
    pub fn references_only(&self, mut known: impl FnMut(&str) -> bool) -> bool {
        self.buckets
            .values()
            .all(|keys| keys.iter().all(|key| known(key)))
    }

    /// Set-to-list projection with sorted keys for stable output.
    pub fn to_snapshot(&self) -> IndexSnapshot {
        let buckets = self
            .buckets
            .iter()
            .map(|(token, keys)| {
                let mut keys: Vec<String> = keys.iter().cloned().collect();
                keys.sort();
                (token.clone(), keys)
            })
            .collect();
        IndexSnapshot {
            version: INDEX_SNAPSHOT_VERSION,
            fingerprint: String::new(),
            buckets,
        }
    }

    /// Rebuild sets from a persisted snapshot. Returns `None` on a version mismatch.
    pub fn from_snapshot(snapshot: IndexSnapshot) -> Option<Self> {
        if snapshot.version != INDEX_SNAPSHOT_VERSION {
            return None;
        }
        let buckets = snapshot
            .buckets
            .into_iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(token, keys)| (token, keys.into_iter().collect()))
            .collect();
        Some(Self { buckets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(key: &str, definitions: &[&str]) -> Term {
        Term::new(key, definitions.iter().copied()).unwrap()
    }

    #[test]
    fn add_then_remove_leaves_no_empty_buckets() {
        let mut index = InvertedIndex::default();
        let lol = term("LOL", &["laugh out loud"]);
        let brb = term("BRB", &["be right back", "back soon"]);
        index.add_term(&lol);
        index.add_term(&brb);
        assert_eq!(index.bucket("back").map(|keys| keys.len()), Some(1));

        index.remove_term(&lol);
        assert!(index.bucket("laugh").is_none());
        assert!(index.bucket("loud").is_none());
        assert!(index.bucket("back").is_some());

        index.remove_term(&brb);
        assert!(index.is_empty());
    }

    #[test]
    fn intersect_short_circuits_on_missing_bucket() {
        let mut index = InvertedIndex::default();
        index.add_term(&term("LOL", &["laugh out loud"]));
        index.add_term(&term("LMAO", &["laughing my ass off", "laugh hard"]));

        let both = index.intersect_candidates(&["laugh"]);
        assert_eq!(both.len(), 2);

        let one = index.intersect_candidates(&["laugh", "loud"]);
        assert_eq!(one, HashSet::from(["LOL".to_string()]));

        assert!(index.intersect_candidates(&["laugh", "missing"]).is_empty());
        assert!(index.intersect_candidates::<&str>(&[]).is_empty());
    }

    #[test]
    fn update_swaps_tokens() {
        let mut index = InvertedIndex::default();
        let old = term("LOL", &["laugh out loud"]);
        let new = term("LOL", &["very funny"]);
        index.add_term(&old);
        index.update_term(&old, &new);

        assert!(index.bucket("laugh").is_none());
        assert!(index.bucket("very").unwrap().contains("LOL"));
    }

    #[test]
    fn expand_follows_anchor() {
        let mut index = InvertedIndex::default();
        index.add_term(&term("LOL", &["laughing out loud"]));
        index.add_term(&term("SLAY", &["slaughter the look"]));

        let infix = index.expand_candidates("augh", TokenAnchor::Infix);
        assert_eq!(infix.len(), 2);
        let prefix = index.expand_candidates("laugh", TokenAnchor::Prefix);
        assert_eq!(prefix, HashSet::from(["LOL".to_string()]));
        let suffix = index.expand_candidates("ter", TokenAnchor::Suffix);
        assert_eq!(suffix, HashSet::from(["SLAY".to_string()]));
        assert!(index.expand_candidates("laugh", TokenAnchor::Exact).is_empty());
    }

    #[test]
    fn snapshot_restores_equal_index() {
        let index = InvertedIndex::build(&[
            term("LOL", &["laugh out loud"]),
            term("ROFL", &["rolling on the floor laughing"]),
        ]);
        let snapshot = index.to_snapshot();
        let encoded = serde_json::to_string(&snapshot).unwrap();
        let decoded: IndexSnapshot = serde_json::from_str(&encoded).unwrap();
        assert_eq!(InvertedIndex::from_snapshot(decoded), Some(index));
    }

    #[test]
    fn snapshot_with_other_version_is_rejected() {
        let mut snapshot = InvertedIndex::default().to_snapshot();
        snapshot.version = INDEX_SNAPSHOT_VERSION + 1;
        assert!(InvertedIndex::from_snapshot(snapshot).is_none());
    }
}
