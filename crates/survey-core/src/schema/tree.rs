//! The read-only survey schema tree (spec.md §3 "Survey Schema").
//!
//! Deserialized once from YAML and never mutated afterwards — every method
//! here borrows `&self`.

use indexmap::IndexMap;
use serde::Deserialize;

/// Storage keys starting with this prefix are reserved for a strategy's own
/// bookkeeping (e.g. the multi-step compound strategy's step marker) and may
/// never be used as a question's `store_key`.
pub const RESERVED_KEY_PREFIX: &str = "_";

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonOption {
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    pub store_key: String,
    #[serde(default)]
    pub options: Vec<ButtonOption>,
    pub rating_min: Option<u32>,
    pub rating_max: Option<u32>,
    pub next_button_label: Option<String>,
    pub finish_button_label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// The full, immutable schema tree.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    sections: IndexMap<String, Section>,
}

impl Schema {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    pub fn sections(&self) -> &IndexMap<String, Section> {
        &self.sections
    }

    /// Section identifiers in the order they appear in the schema source
    /// (YAML document order, preserved by `IndexMap`). Used for the
    /// section-selection keyboard per spec.md §4.6.
    pub fn section_ids_in_order(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Section identifiers sorted for deterministic forward-pipeline
    /// aggregation, independent of YAML document order (spec.md §4.8, §9
    /// Open Questions: "Section ordering in keyboards").
    pub fn section_ids_sorted(&self) -> Vec<&str> {
        let mut ids = self.section_ids_in_order();
        ids.sort_unstable();
        ids
    }

    /// Find the question with the given `store_key`, searching every section.
    pub fn question_by_store_key(&self, store_key: &str) -> Option<(&str, &Question)> {
        for (section_id, section) in &self.sections {
            if let Some(q) = section.questions.iter().find(|q| q.store_key == store_key) {
                return Some((section_id.as_str(), q));
            }
        }
        None
    }
}

impl Section {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_index(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }
}
