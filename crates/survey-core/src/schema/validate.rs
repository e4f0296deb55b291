//! Schema validation (spec.md §4.2).
//!
//! Ordering is mandatory: structural checks first (titles, prompts, storage
//! keys, global uniqueness, the reserved-key-prefix rule), then each
//! question is handed to its strategy's validator. Any failure aborts
//! startup.

use std::collections::HashSet;

use crate::error::{Result, SurveyError};
use crate::schema::tree::{Schema, RESERVED_KEY_PREFIX};
use crate::strategy::StrategyResolver;

pub fn validate(schema: &Schema, resolver: &dyn StrategyResolver) -> Result<()> {
    if schema.sections().is_empty() {
        return Err(SurveyError::SchemaValidation {
            section: String::new(),
            question: String::new(),
            reason: "schema defines no sections".to_string(),
        });
    }

    let mut seen_store_keys: HashSet<&str> = HashSet::new();

    for (section_id, section) in schema.sections() {
        if section.title.trim().is_empty() {
            return Err(SurveyError::SchemaValidation {
                section: section_id.clone(),
                question: String::new(),
                reason: "section title must not be empty".to_string(),
            });
        }

        for question in &section.questions {
            structural_check(section_id, question)?;

            if !seen_store_keys.insert(question.store_key.as_str()) {
                return Err(SurveyError::SchemaValidation {
                    section: section_id.clone(),
                    question: question.id.clone(),
                    reason: format!("duplicate store_key '{}'", question.store_key),
                });
            }
        }
    }

    // Second pass: strategy-specific validation, once global uniqueness is settled.
    for (section_id, section) in schema.sections() {
        for question in &section.questions {
            let normalized = crate::strategy::normalize_name(&question.type_tag);
            let strategy = resolver.resolve(&normalized).ok_or_else(|| SurveyError::SchemaValidation {
                section: section_id.clone(),
                question: question.id.clone(),
                reason: format!("unknown question type '{}'", question.type_tag),
            })?;
            strategy.validate(section_id, question).map_err(|e| SurveyError::SchemaValidation {
                section: section_id.clone(),
                question: question.id.clone(),
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

fn structural_check(section_id: &str, question: &crate::schema::tree::Question) -> Result<()> {
    if question.id.trim().is_empty() {
        return Err(SurveyError::SchemaValidation {
            section: section_id.to_string(),
            question: String::new(),
            reason: "question id must not be empty".to_string(),
        });
    }
    if question.prompt.trim().is_empty() {
        return Err(SurveyError::SchemaValidation {
            section: section_id.to_string(),
            question: question.id.clone(),
            reason: "prompt must not be empty".to_string(),
        });
    }
    if question.store_key.trim().is_empty() {
        return Err(SurveyError::SchemaValidation {
            section: section_id.to_string(),
            question: question.id.clone(),
            reason: "store_key must not be empty".to_string(),
        });
    }
    if question.store_key.starts_with(RESERVED_KEY_PREFIX) {
        return Err(SurveyError::SchemaValidation {
            section: section_id.to_string(),
            question: question.id.clone(),
            reason: format!(
                "store_key must not start with reserved prefix '{}'",
                RESERVED_KEY_PREFIX
            ),
        });
    }
    Ok(())
}
