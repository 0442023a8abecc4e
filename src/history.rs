use std::collections::VecDeque;

use super::types::{HistoryEntry, SearchKind};

/// Past queries, newest first.
///
/// Unbounded unless built with [`HistoryLog::with_limit`], in which case the
/// oldest entries fall off the end.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    limit: Option<usize>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub fn record(&mut self, query: impl Into<String>, kind: SearchKind, result_keys: Vec<String>) {
        self.entries
            .push_front(HistoryEntry::new(query, kind, result_keys));
        if let Some(limit) = self.limit {
            self.entries.truncate(limit);
        }
    }

    /// Entries from newest to oldest.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, position: usize) -> Option<&HistoryEntry> {
        self.entries.get(position)
    }

    /// Remove the entry at `position` (0 is newest). False if out of range.
    pub fn delete_at(&mut self, position: usize) -> bool {
        self.entries.remove(position).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
