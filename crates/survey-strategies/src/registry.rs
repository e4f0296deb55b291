//! The built-in `StrategyResolver` implementation (spec.md §4.3).
//!
//! Mirrors `skynet-channels::ChannelManager`'s registration pattern: a
//! builder that panics on duplicate registration — a fatal startup
//! programming error, never a runtime condition — handed off to an
//! immutable, freely-`Sync` lookup table once construction is done. No lock
//! is needed after `build()`: nothing ever mutates a `Registry` again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use survey_core::strategy::{normalize_name, QuestionStrategy, StrategyResolver};

use crate::buttons::ButtonChoiceStrategy;
use crate::compound::CompoundStrategy;
use crate::free_text::FreeTextStrategy;

/// Accumulates strategies during startup wiring. Not meant to outlive
/// `main`'s setup code; call [`RegistryBuilder::build`] once registration is
/// complete.
#[derive(Default)]
pub struct RegistryBuilder {
    strategies: Mutex<HashMap<String, Arc<dyn QuestionStrategy>>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy under its own [`QuestionStrategy::name`].
    ///
    /// # Panics
    /// Panics if a strategy with the same normalized name is already
    /// registered — per spec.md §4.3 this is a fatal programming error, not
    /// a recoverable condition.
    pub fn register(&self, strategy: Arc<dyn QuestionStrategy>) {
        let key = normalize_name(strategy.name());
        let mut map = self.strategies.lock().expect("strategy registry mutex poisoned");
        if map.contains_key(&key) {
            panic!("duplicate strategy registration: '{key}'");
        }
        tracing::debug!(strategy = %key, "registered question strategy");
        map.insert(key, strategy);
    }

    pub fn build(self) -> Registry {
        Registry {
            strategies: self.strategies.into_inner().expect("strategy registry mutex poisoned"),
        }
    }
}

/// Read-only, name-keyed lookup table of registered strategies.
pub struct Registry {
    strategies: HashMap<String, Arc<dyn QuestionStrategy>>,
}

impl Registry {
    /// The three built-in strategies: free text, single-choice buttons, and
    /// the multi-step compound strategy.
    pub fn builtin() -> Self {
        let builder = RegistryBuilder::new();
        builder.register(Arc::new(FreeTextStrategy));
        builder.register(Arc::new(ButtonChoiceStrategy));
        builder.register(Arc::new(CompoundStrategy::new()));
        builder.build()
    }
}

impl StrategyResolver for Registry {
    fn resolve(&self, type_tag: &str) -> Option<&dyn QuestionStrategy> {
        self.strategies.get(&normalize_name(type_tag)).map(Arc::as_ref)
    }
}
