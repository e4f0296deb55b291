//! Cancellation context shared by every outbound-port call.
//!
//! Wraps a [`tokio_util::sync::CancellationToken`] with an optional deadline,
//! letting the process-level shutdown signal propagate down to in-flight
//! port calls (spec.md §5 "Cancellation / timeouts").

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

#[derive(Debug, Clone)]
pub struct CancelContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelContext {
    /// A context that never cancels and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A context tied to an existing cancellation token, e.g. the
    /// process-wide shutdown token handed down from `main`.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// `Some(error)` when the context is already done; operations must
    /// return this immediately without attempting I/O.
    pub fn done_error(&self) -> Option<TransportError> {
        if self.token.is_cancelled() {
            return Some(TransportError::ContextCanceled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Some(TransportError::ContextDeadline);
            }
        }
        None
    }

    pub fn is_done(&self) -> bool {
        self.done_error().is_some()
    }
}

impl Default for CancelContext {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn background_never_done() {
        let ctx = CancelContext::background();
        assert!(ctx.done_error().is_none());
    }

    #[tokio::test]
    async fn canceled_token_is_done() {
        let ctx = CancelContext::background();
        ctx.cancel();
        assert!(matches!(ctx.done_error(), Some(TransportError::ContextCanceled)));
    }

    #[tokio::test]
    async fn past_deadline_is_done() {
        let deadline = Instant::now() - Duration::from_millis(1);
        let ctx = CancelContext::with_deadline(deadline);
        assert!(matches!(ctx.done_error(), Some(TransportError::ContextDeadline)));
    }
}
