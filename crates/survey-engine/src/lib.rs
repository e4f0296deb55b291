//! Transport-agnostic conversation engine (spec.md §4.4-§4.8).
//!
//! Wires `survey-core`'s FSMs, schema, and strategy contract together with
//! a concurrent per-participant store and a single dispatch entry point.
//! A transport crate (`survey-telegram`) only needs to translate its own
//! update type into an [`event::InboundEvent`] and implement `OutboundPort`.

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod forward;
pub mod labels;
pub mod menu;
pub mod payload;
pub mod record_flow;
pub mod render;
pub mod store;

pub use dispatcher::dispatch;
pub use error::{EngineError, Result};
pub use event::{InboundEvent, Sender};
pub use store::UserStateStore;
