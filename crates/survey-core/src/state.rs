//! Per-participant state (spec.md §3 "User State").
//!
//! `UserState` itself carries no lock — per spec.md §5 ("individual user
//! states carry their own mutex"), `survey-engine`'s `UserStateStore` wraps
//! each entry in `Arc<tokio::sync::Mutex<UserState>>` and that wrapper *is*
//! the per-entry mutex. Keeping the mutex out of this struct lets it stay a
//! plain, freely-constructible value for unit tests.

use survey_port::MessageHandle;

use crate::fsm::{MainMenuFsm, RecordFsm};
use crate::record::Record;

#[derive(Debug, Clone)]
pub struct UserState {
    pub participant_id: String,
    pub display_name: String,
    pub records: Vec<Record>,
    pub draft: Option<Record>,
    pub current_section: Option<String>,
    pub current_question_index: usize,
    pub last_prompt: Option<MessageHandle>,
    pub list_offset: usize,
    pub main_menu: MainMenuFsm,
    pub record_fsm: RecordFsm,
    /// Monotonic per-participant counter used to mint record identifiers
    /// (spec.md §9 Open Questions: "Record identifier uniqueness"). Chosen
    /// over "participant-id + nanosecond timestamp" because the latter can
    /// collide under bursty save rates; a counter cannot.
    record_seq: u64,
}

impl UserState {
    pub fn new(participant_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            display_name: display_name.into(),
            records: Vec::new(),
            draft: None,
            current_section: None,
            current_question_index: 0,
            last_prompt: None,
            list_offset: 0,
            main_menu: MainMenuFsm::new(),
            record_fsm: RecordFsm::new(),
            record_seq: 0,
        }
    }

    /// Mint the next record identifier for this participant: a monotonic
    /// counter rather than a timestamp, so it cannot collide under bursty
    /// save rates.
    pub fn next_record_id(&mut self) -> String {
        self.record_seq += 1;
        format!("{}-{}", self.participant_id, self.record_seq)
    }

    /// The message identifier of the last outbound prompt, or `0` when
    /// there is none (the convention `RenderContext` uses to mean "no
    /// existing prompt").
    pub fn last_message_id(&self) -> i64 {
        self.last_prompt.as_ref().map(|h| h.message_id).unwrap_or(0)
    }

    /// Return the current draft, creating an empty one if absent.
    pub fn ensure_draft(&mut self) -> &mut Record {
        self.draft.get_or_insert_with(Record::new_draft)
    }

    /// Clear position bookkeeping (`current_section`, `current_question_index`,
    /// `last_prompt`) without touching the draft or saved records — used by
    /// `exit-to-menu` and the common tail of every `record-idle` entry.
    pub fn clear_position(&mut self) {
        self.current_section = None;
        self.current_question_index = 0;
        self.last_prompt = None;
    }

    /// Most recently saved record, if any (spec.md §4.8 selection preference
    /// and §8 "Selection preference" law).
    pub fn latest_saved(&self) -> Option<&Record> {
        self.records.iter().filter(|r| r.saved).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_no_last_message() {
        let u = UserState::new("u1", "Alice");
        assert_eq!(u.last_message_id(), 0);
    }

    #[test]
    fn ensure_draft_creates_once() {
        let mut u = UserState::new("u1", "Alice");
        assert!(u.draft.is_none());
        u.ensure_draft().data.insert("name".into(), "Alice".into());
        assert!(u.draft.is_some());
        assert_eq!(u.draft.as_ref().unwrap().data.get("name").unwrap(), "Alice");
    }

    #[test]
    fn latest_saved_prefers_last_entry() {
        let mut u = UserState::new("u1", "Alice");
        let mut r1 = Record::new_draft();
        r1.finalize("r1".into(), chrono::Utc::now());
        let mut r2 = Record::new_draft();
        r2.finalize("r2".into(), chrono::Utc::now());
        u.records.push(r1);
        u.records.push(r2);
        assert_eq!(u.latest_saved().unwrap().id, "r2");
    }

    #[test]
    fn clear_position_preserves_draft_and_records() {
        let mut u = UserState::new("u1", "Alice");
        u.current_section = Some("Personal".into());
        u.current_question_index = 2;
        u.ensure_draft();
        u.clear_position();
        assert!(u.current_section.is_none());
        assert_eq!(u.current_question_index, 0);
        assert!(u.draft.is_some());
    }
}
