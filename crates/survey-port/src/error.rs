use std::time::Duration;

use thiserror::Error;

/// Fixed error taxonomy for every outbound-port operation (spec.md §4.1/§7).
#[derive(Debug, Error, Clone)]
pub enum TransportError {
    /// Telegram-style "the requested edit would not change the message" —
    /// the engine treats this as a no-op success, never as a failure.
    #[error("message not modified")]
    MessageNotModified,

    /// Rate-limited by the transport; carries the advertised retry-after.
    #[error("rate limited, retry after {0:?}")]
    RateLimited(Duration),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// `markup` was not recognized by the concrete adapter.
    #[error("bad payload: {0}")]
    BadPayload(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("context canceled")]
    ContextCanceled,

    #[error("context deadline exceeded")]
    ContextDeadline,

    #[error("unknown transport error: {0}")]
    Unknown(String),
}

impl TransportError {
    /// Short machine-readable code, mirroring the teacher's `SkynetError::code`.
    pub fn code(&self) -> &'static str {
        match self {
            TransportError::MessageNotModified => "MESSAGE_NOT_MODIFIED",
            TransportError::RateLimited(_) => "RATE_LIMITED",
            TransportError::BadRequest(_) => "BAD_REQUEST",
            TransportError::BadPayload(_) => "BAD_PAYLOAD",
            TransportError::Forbidden(_) => "FORBIDDEN",
            TransportError::ContextCanceled => "CONTEXT_CANCELED",
            TransportError::ContextDeadline => "CONTEXT_DEADLINE",
            TransportError::Unknown(_) => "UNKNOWN",
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
