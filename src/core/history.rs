//! # History Cache
//!
//! Most-recent-first cache of results, capped at [`HISTORY_CAPACITY`].
//! Independent of the timeline: clearing one never touches the other.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::result::ResultModel;

pub const HISTORY_CAPACITY: usize = 20;

/// Label shown in place of SQL when a result has none.
pub const NO_SQL_PLACEHOLDER: &str = "Natural language query";

#[derive(Debug)]
pub struct HistoryCache {
    entries: VecDeque<Arc<ResultModel>>,
    capacity: usize,
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts at the front, evicting the oldest entry once full.
    pub fn push(&mut self, result: Arc<ResultModel>) {
        self.entries.push_front(result);
        self.entries.truncate(self.capacity);
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

    pub fn get(&self, index: usize) -> Option<&Arc<ResultModel>> {
        self.entries.get(index)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResultModel>> {
        self.entries.iter()
    }

    pub fn entries(&self) -> Vec<HistoryEntryView<'_>> {
        self.iter().map(|r| HistoryEntryView::new(r)).collect()
    }
}

/// Read-only projection of one history entry for the "recent queries" view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntryView<'a> {
    pub sql_label: &'a str,
    pub success: bool,
    /// Meaningful only when `success` is true.
    pub row_count: usize,
}

impl<'a> HistoryEntryView<'a> {
    pub fn new(result: &'a ResultModel) -> Self {
        Self {
            sql_label: if result.has_sql() {
                &result.sql_query
            } else {
                NO_SQL_PLACEHOLDER
            },
            success: result.success,
            row_count: result.row_count(),
        }
    }

    pub fn status_glyph(&self) -> &'static str {
        if self.success { "✓" } else { "✗" }
    }

    pub fn summary(&self) -> String {
        if self.success {
            format!("{} rows", self.row_count)
        } else {
            "Failed".to_string()
        }
    }
}
