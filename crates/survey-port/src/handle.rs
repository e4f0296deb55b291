use serde_json::Value;

/// Handle returned by the port for every successful send/edit.
///
/// Carries a non-zero message identifier on success; the engine stores it in
/// the owning `UserState` to decide between edit and send-new on the next
/// render (spec.md §3 "Outbound Message Handle").
#[derive(Debug, Clone, PartialEq)]
pub struct MessageHandle {
    pub chat_id: i64,
    pub message_id: i64,
    /// Stable tag identifying the concrete transport (e.g. `"telegram"`).
    pub transport: String,
    /// The text payload as actually sent/edited (post markdown-escaping etc).
    pub payload: String,
    /// Opaque transport-specific metadata (e.g. parse mode used).
    pub metadata: Value,
}

impl MessageHandle {
    pub fn new(chat_id: i64, message_id: i64, transport: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id,
            transport: transport.into(),
            payload: payload.into(),
            metadata: Value::Null,
        }
    }
}
