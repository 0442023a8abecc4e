use std::collections::HashSet;

use super::super::{
    index::{InvertedIndex, TokenAnchor},
    tokenizer::{normalize_for_substring_match, tokenize_normalized},
    types::{LexicalStore, Term},
};

/// A definition query reduced to its normalized needle and index constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Normalized, trimmed query every matching definition must contain.
    pub needle: String,
    /// Tokens that must appear verbatim as index tokens.
    pub exact: Vec<String>,
    /// Tokens cut off by the query edge: they only need to line up with part of
    /// an index token.
    pub anchored: Vec<(String, TokenAnchor)>,
}

impl QueryPlan {
    /// True if the index cannot narrow this query and every term must be scanned.
    pub fn needs_full_scan(&self) -> bool {
        self.exact.is_empty() && self.anchored.is_empty()
    }
}

/// Normalize `query` and classify its tokens by how much of them the query shows.
///
/// A token with separators on both sides inside the query must equal an index
/// token; one touching the start or end of the query may continue in the
/// definition, so it is matched as a suffix, prefix or infix instead.
pub fn plan_query(query: &str) -> QueryPlan {
    let needle = normalize_for_substring_match(query).trim().to_string();
    let mut exact = Vec::new();
    let mut anchored = Vec::new();

    for token in tokenize_normalized(&needle) {
        let anchor = TokenAnchor::from_bounds(token.start > 0, token.end < needle.len());
        match anchor {
            TokenAnchor::Exact => exact.push(token.term),
            _ => anchored.push((token.term, anchor)),
        }
    }

    QueryPlan {
        needle,
        exact,
        anchored,
    }
}

impl LexicalStore {
    /// Exact key first, then the first key equal ignoring case.
    pub fn find_by_key(&self, key: &str) -> Option<&Term> {
        let key = key.trim();
        if let Some(term) = self.terms.get(key) {
            return Some(term);
        }

        let lowered = key.to_lowercase();
        self.terms
            .iter()
            .filter(|(candidate, _)| candidate.to_lowercase() == lowered)
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, term)| term)
    }

    /// Terms with a definition containing `query`, ignoring case and diacritics,
    /// sorted by key.
    ///
    /// The index only narrows candidates; every result is checked by substring.
    pub fn find_by_definition_substring(&self, query: &str) -> Vec<&Term> {
        let plan = plan_query(query);
        if plan.needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&Term> = if plan.needs_full_scan() {
            self.terms
                .values()
                .filter(|term| contains_needle(term, &plan.needle))
                .collect()
        } else {
            let candidates = candidate_keys(&self.index, &plan);
            candidates
                .iter()
                .filter_map(|key| self.terms.get(key))
                .filter(|term| contains_needle(term, &plan.needle))
                .collect()
        };

        matches.sort_by(|a, b| a.key().cmp(b.key()));
        matches
    }
}

fn candidate_keys(index: &InvertedIndex, plan: &QueryPlan) -> HashSet<String> {
    let mut candidates: Option<HashSet<String>> = None;

    if !plan.exact.is_empty() {
        let exact = index.intersect_candidates(&plan.exact);
        if exact.is_empty() {
            return exact;
        }
        candidates = Some(exact);
    }

    for (token, anchor) in &plan.anchored {
        let expanded = index.expand_candidates(token, *anchor);
        let narrowed = match candidates {
            Some(mut current) => {
                current.retain(|key| expanded.contains(key));
                current
            }
            None => expanded,
        };
        if narrowed.is_empty() {
            return narrowed;
        }
        candidates = Some(narrowed);
    }

    candidates.unwrap_or_default()
}

fn contains_needle(term: &Term, needle: &str) -> bool {
    term.definitions()
        .iter()
        .any(|definition| normalize_for_substring_match(definition).contains(needle))
}
