//! Tunables for the search controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quiet period after the last keystroke before a request is issued.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Shortest trimmed query that reaches the provider.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// Debounce and length thresholds, overridable from CLI config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    pub min_query_len: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Whether `query` is long enough to search, counted in characters
    /// after trimming.
    pub fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_len
    }
}
