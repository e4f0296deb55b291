//! In-memory fake port for exercising the engine without a live transport.
//!
//! Records every call it receives and lets a test queue canned
//! success/error responses for `send`/`edit`, analogous to how
//! `skynet-channels::Channel` is a trait object specifically so adapters can
//! be swapped for fakes in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::context::CancelContext;
use crate::error::TransportError;
use crate::handle::MessageHandle;
use crate::markup::Markup;
use crate::port::OutboundPort;

/// One recorded invocation of a `FakePort` method, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum PortCall {
    Send { chat_id: i64, text: String, markup: Markup },
    Edit { chat_id: i64, message_id: i64, text: String, markup: Markup },
    AcknowledgeCallback { callback_id: String, text: String },
    Delete { chat_id: i64, message_id: i64 },
}

#[derive(Default)]
pub struct FakePort {
    pub calls: Mutex<Vec<PortCall>>,
    send_queue: Mutex<VecDeque<Result<MessageHandle, TransportError>>>,
    edit_queue: Mutex<VecDeque<Result<MessageHandle, TransportError>>>,
    next_message_id: AtomicI64,
}

impl FakePort {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            send_queue: Mutex::new(VecDeque::new()),
            edit_queue: Mutex::new(VecDeque::new()),
            next_message_id: AtomicI64::new(1),
        }
    }

    /// Queue a canned result for the next `send` call (FIFO).
    pub fn queue_send(&self, result: Result<MessageHandle, TransportError>) {
        self.send_queue.lock().unwrap().push_back(result);
    }

    /// Queue a canned result for the next `edit` call (FIFO).
    pub fn queue_edit(&self, result: Result<MessageHandle, TransportError>) {
        self.edit_queue.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<PortCall> {
        self.calls.lock().unwrap().clone()
    }

    fn alloc_message_id(&self) -> i64 {
        self.next_message_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl OutboundPort for FakePort {
    async fn send(
        &self,
        ctx: &CancelContext,
        chat_id: i64,
        text: &str,
        markup: Markup,
    ) -> Result<MessageHandle, TransportError> {
        if let Some(err) = ctx.done_error() {
            return Err(err);
        }
        self.calls.lock().unwrap().push(PortCall::Send {
            chat_id,
            text: text.to_string(),
            markup: markup.clone(),
        });
        if let Some(queued) = self.send_queue.lock().unwrap().pop_front() {
            return queued;
        }
        Ok(MessageHandle::new(chat_id, self.alloc_message_id(), "fake", text))
    }

    async fn edit(
        &self,
        ctx: &CancelContext,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Markup,
    ) -> Result<MessageHandle, TransportError> {
        if let Some(err) = ctx.done_error() {
            return Err(err);
        }
        self.calls.lock().unwrap().push(PortCall::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            markup: markup.clone(),
        });
        if let Some(queued) = self.edit_queue.lock().unwrap().pop_front() {
            return queued;
        }
        Ok(MessageHandle::new(chat_id, message_id, "fake", text))
    }

    async fn acknowledge_callback(
        &self,
        ctx: &CancelContext,
        callback_id: &str,
        text: &str,
    ) -> Result<(), TransportError> {
        if let Some(err) = ctx.done_error() {
            return Err(err);
        }
        self.calls.lock().unwrap().push(PortCall::AcknowledgeCallback {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete(&self, ctx: &CancelContext, chat_id: i64, message_id: i64) -> Result<(), TransportError> {
        if let Some(err) = ctx.done_error() {
            return Err(err);
        }
        self.calls.lock().unwrap().push(PortCall::Delete { chat_id, message_id });
        Ok(())
    }
}
