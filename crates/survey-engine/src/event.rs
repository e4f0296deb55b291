//! Inbound event shapes the dispatcher classifies (spec.md §4.7).
//!
//! Transport-agnostic: the concrete adapter (`survey-telegram`) maps a
//! `teloxide` `Update` into one of these before calling `dispatch`.

/// Identity extracted from an inbound event. Events lacking a sender are
/// rejected by the dispatcher before any side effect (spec.md §4.7 step 1).
#[derive(Debug, Clone)]
pub struct Sender {
    pub participant_id: String,
    pub chat_id: i64,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// The `/start` command.
    StartCommand,
    /// A plain text message. `message_id` is `0` when the transport does not
    /// expose one; it is only used to delete free-text answers when
    /// `DELETE_USER_MESSAGES` is enabled (spec.md §6).
    Text { body: String, message_id: i64 },
    /// A callback query: its id (for acknowledgement) and raw payload.
    Callback { callback_id: String, payload: String },
}
