//! Maps `teloxide::RequestError` onto the engine's fixed [`TransportError`]
//! taxonomy (spec.md §7 "Error taxonomy").
//!
//! Telegram's own API error surface isn't a stable enum across versions —
//! the description string is the only reliable thing to match on for the
//! finer-grained cases (`message is not modified`, `Too Many Requests`).
//! `teloxide::ApiError`'s `Display` forwards that description verbatim, so
//! substring matching here tracks the wire protocol rather than a
//! particular teloxide release.

use std::time::Duration;

use survey_port::TransportError;
use teloxide::types::Seconds;
use teloxide::ApiError;
use teloxide::RequestError;

pub fn map_request_error(err: RequestError) -> TransportError {
    match err {
        RequestError::Api(api_err) => map_api_error(api_err),
        RequestError::RetryAfter(Seconds(seconds)) => TransportError::RateLimited(Duration::from_secs(seconds as u64)),
        RequestError::MigrateToChatId(_) => TransportError::BadRequest("chat migrated to a new id".to_string()),
        RequestError::Network(e) => TransportError::Unknown(format!("network error: {e}")),
        RequestError::InvalidJson { source, .. } => TransportError::Unknown(format!("invalid JSON: {source}")),
        RequestError::Io(e) => TransportError::Unknown(format!("I/O error: {e}")),
        other => TransportError::Unknown(other.to_string()),
    }
}

fn map_api_error(err: ApiError) -> TransportError {
    let description = err.to_string();
    let lower = description.to_lowercase();

    if lower.contains("message is not modified") {
        return TransportError::MessageNotModified;
    }
    if lower.contains("too many requests") {
        return TransportError::RateLimited(Duration::from_secs(1));
    }
    if lower.contains("forbidden") || lower.contains("bot was blocked") || lower.contains("kicked") {
        return TransportError::Forbidden(description);
    }
    if lower.contains("bad request") || lower.contains("chat not found") || lower.contains("message to edit not found") {
        return TransportError::BadRequest(description);
    }

    TransportError::Unknown(description)
}
