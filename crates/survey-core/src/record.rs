//! The `Record` aggregate (spec.md §3 "Record").

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A draft or saved answer set owned by exactly one participant.
#[derive(Debug, Clone, Default)]
pub struct Record {
    /// Assigned at save time; empty while still a draft.
    pub id: String,
    /// `store_key -> stored value`, including any reserved `_`-prefixed keys
    /// a strategy uses for its own bookkeeping.
    pub data: HashMap<String, String>,
    pub saved: bool,
    /// Set at save time; `None` while still a draft.
    pub created_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new_draft() -> Self {
        Self::default()
    }

    /// Read a stored value, treating an absent or empty-string entry the
    /// same way (spec.md §8 "Missing-answer substitution").
    pub fn get(&self, store_key: &str) -> Option<&str> {
        self.data.get(store_key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Finalize this draft into a saved record: assign `id`, freeze
    /// `created_at`, mark `saved`. The open question of identifier
    /// uniqueness (spec.md §9) is resolved here via a monotonic
    /// per-participant counter rather than nanosecond timestamps — see
    /// DESIGN.md.
    pub fn finalize(&mut self, id: String, now: DateTime<Utc>) {
        self.id = id;
        self.created_at = Some(now);
        self.saved = true;
    }
}
