//! Shared send-vs-edit decision used by every prompt-rendering path
//! (spec.md §4.6 "Entering selecting-section" / "Entering answering-question").

use survey_port::{CancelContext, MessageHandle, Markup, OutboundPort, TransportError};

use crate::error::Result;

/// Send a fresh message, or edit the previous one in place, deciding per
/// `force_new` and whether a previous handle exists.
///
/// `message-not-modified` is treated as an idempotent success: the previous
/// handle is returned unchanged rather than surfaced as an error (spec.md §7
/// "Propagation policy").
pub async fn send_or_edit(
    port: &dyn OutboundPort,
    ctx: &CancelContext,
    chat_id: i64,
    previous: &Option<MessageHandle>,
    text: &str,
    markup: Markup,
    force_new: bool,
) -> Result<MessageHandle> {
    let edit_target = if force_new { None } else { previous.as_ref() };

    match edit_target {
        Some(handle) => match port.edit(ctx, chat_id, handle.message_id, text, markup).await {
            Ok(new_handle) => Ok(new_handle),
            Err(TransportError::MessageNotModified) => Ok(handle.clone()),
            Err(e) => Err(e.into()),
        },
        None => Ok(port.send(ctx, chat_id, text, markup).await?),
    }
}
