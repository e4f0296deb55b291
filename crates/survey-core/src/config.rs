//! Process configuration, loaded once at startup from environment variables
//! via `figment`, the same loader `skynet-core::config::SkynetConfig::load`
//! uses. Field names follow spec.md §6 exactly (unprefixed env var names:
//! `BOT_TOKEN`, `SCHEMA_PATH`, `DELETE_USER_MESSAGES`), so the env provider
//! reads keys verbatim rather than under a `SURVEY_` prefix.

use figment::providers::Env;
use figment::Figment;
use serde::Deserialize;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::{Result, SurveyError};

/// Default location for the survey schema YAML file.
const DEFAULT_SCHEMA_PATH: &str = "survey.yaml";

/// Raw shape extracted from the environment; optional fields distinguish
/// "absent" from a meaningful default before [`SurveyConfig::load`] applies
/// fallbacks and validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    bot_token: Option<String>,
    schema_path: Option<String>,
    #[serde(default)]
    delete_user_messages: bool,
}

/// Top-level process configuration.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// Credential for the chat-transport adapter. Required.
    pub bot_token: String,

    /// Path to the survey schema YAML file.
    pub schema_path: String,

    /// When true, free-text answer messages are deleted via the port after
    /// processing (scoped to the free-text strategy only).
    pub delete_user_messages: bool,
}

impl SurveyConfig {
    /// Load configuration from the process environment.
    ///
    /// `BOT_TOKEN` must be present and non-empty. `TARGET_USER_ID` is parsed
    /// separately (see [`TargetUser`]) since its absence/zero is not fatal —
    /// it only disables reviewer-forward.
    pub fn load() -> Result<Self> {
        let raw: RawConfig =
            Figment::new().merge(Env::prefixed("")).extract().map_err(|e| SurveyError::Config(e.to_string()))?;

        let bot_token = raw.bot_token.ok_or_else(|| SurveyError::Config("BOT_TOKEN is required".to_string()))?;
        if bot_token.trim().is_empty() {
            return Err(SurveyError::Config("BOT_TOKEN is empty".to_string()));
        }

        Ok(Self {
            bot_token,
            schema_path: raw.schema_path.unwrap_or_else(|| DEFAULT_SCHEMA_PATH.to_string()),
            delete_user_messages: raw.delete_user_messages,
        })
    }
}

/// Reviewer-forward target, a process-wide singleton mutated only by tests.
///
/// Reads concurrently; writes are rare (startup and test setup only), so a
/// plain `AtomicI64` gives publication safety without a mutex, matching the
/// "Global state" discipline in spec.md's Design Notes.
pub struct TargetUser(AtomicI64);

impl TargetUser {
    /// Parse `TARGET_USER_ID` from the environment.
    ///
    /// Absence, an unparsable value, or zero all disable reviewer-forward;
    /// the distinction between "absent" and "zero" is surfaced by the caller
    /// as a single user-visible warning string, not by this type.
    pub fn from_env() -> Self {
        let value = std::env::var("TARGET_USER_ID")
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);
        Self(AtomicI64::new(value))
    }

    pub fn get(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Override the target. Exposed for tests exercising the forward pipeline.
    pub fn set(&self, value: i64) {
        self.0.store(value, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.get() != 0
    }
}

impl Default for TargetUser {
    fn default() -> Self {
        Self(AtomicI64::new(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_user_disabled_by_default() {
        let t = TargetUser::default();
        assert!(!t.is_enabled());
        assert_eq!(t.get(), 0);
    }

    #[test]
    fn target_user_set_enables() {
        let t = TargetUser::default();
        t.set(999);
        assert!(t.is_enabled());
        assert_eq!(t.get(), 999);
    }
}
