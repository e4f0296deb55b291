//! Concurrent user-state store (spec.md §4.4).
//!
//! Grounded on `skynet-sessions::SessionManager`'s get-or-create pattern, but
//! in-memory and lock-per-entry rather than SQLite-backed: the store's own
//! map access is the only thing `DashMap`'s internal sharding protects
//! ("store-level mutex solely for insertion" per spec.md §5); each returned
//! entry carries its own `tokio::sync::Mutex`, held for the entirety of one
//! dispatch.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use survey_core::UserState;

/// One entry per participant, never evicted for the life of the process
/// (spec.md §3 "User State" lifecycle).
pub struct UserStateStore {
    entries: DashMap<String, Arc<Mutex<UserState>>>,
}

impl UserStateStore {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    /// Return the existing entry for `participant_id`, or construct a fresh
    /// one. If an existing entry's display name differs from `display_name`,
    /// it is updated in place; no other field is touched.
    pub async fn get_or_create(&self, participant_id: &str, display_name: &str) -> Arc<Mutex<UserState>> {
        let entry = self
            .entries
            .entry(participant_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(UserState::new(participant_id, display_name))))
            .clone();

        {
            let mut guard = entry.lock().await;
            if guard.display_name != display_name {
                guard.display_name = display_name.to_string();
            }
        }

        entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for UserStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_returns_same_entry_for_same_id() {
        let store = UserStateStore::new();
        let a = store.get_or_create("u1", "Alice").await;
        let b = store.get_or_create("u1", "Alice").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn get_or_create_updates_display_name_only() {
        let store = UserStateStore::new();
        let entry = store.get_or_create("u1", "Alice").await;
        {
            let mut guard = entry.lock().await;
            guard.current_section = Some("personal".to_string());
        }

        let entry2 = store.get_or_create("u1", "Alicia").await;
        let guard = entry2.lock().await;
        assert_eq!(guard.display_name, "Alicia");
        assert_eq!(guard.current_section.as_deref(), Some("personal"));
    }

    #[tokio::test]
    async fn distinct_participants_get_distinct_entries() {
        let store = UserStateStore::new();
        let a = store.get_or_create("u1", "Alice").await;
        let b = store.get_or_create("u2", "Bob").await;
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 2);
    }
}
