use async_trait::async_trait;

use crate::context::CancelContext;
use crate::error::TransportError;
use crate::handle::MessageHandle;
use crate::markup::Markup;

/// Transport-agnostic capability set for chat I/O (spec.md §4.1).
///
/// Implementations must check `ctx.done_error()` first and return it without
/// attempting I/O when the context is already done.
#[async_trait]
pub trait OutboundPort: Send + Sync {
    async fn send(
        &self,
        ctx: &CancelContext,
        chat_id: i64,
        text: &str,
        markup: Markup,
    ) -> Result<MessageHandle, TransportError>;

    /// `message_id == 0` is undefined at the port level; callers must never
    /// invoke `edit` that way (spec.md §4.1).
    async fn edit(
        &self,
        ctx: &CancelContext,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Markup,
    ) -> Result<MessageHandle, TransportError>;

    async fn acknowledge_callback(
        &self,
        ctx: &CancelContext,
        callback_id: &str,
        text: &str,
    ) -> Result<(), TransportError>;

    async fn delete(&self, ctx: &CancelContext, chat_id: i64, message_id: i64) -> Result<(), TransportError>;
}
