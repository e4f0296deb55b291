//! Translates teloxide's `Message`/`CallbackQuery` into the engine's
//! transport-agnostic [`Sender`]/[`InboundEvent`] pair (spec.md §4.7 step 1).

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

use survey_engine::event::{InboundEvent, Sender};

const START_COMMAND: &str = "/start";

/// `None` when the message has no resolvable sender — the dispatcher drops
/// those events.
pub fn from_message(msg: &Message) -> (Option<Sender>, InboundEvent) {
    let sender = msg.from.as_ref().map(|user| Sender {
        participant_id: user.id.0.to_string(),
        chat_id: msg.chat.id.0,
        display_name: user.full_name(),
    });

    let body = msg.text().unwrap_or_default();
    let event = if body.trim() == START_COMMAND {
        InboundEvent::StartCommand
    } else {
        InboundEvent::Text { body: body.to_string(), message_id: msg.id.0 as i64 }
    };

    (sender, event)
}

pub fn from_callback_query(cq: &CallbackQuery) -> (Option<Sender>, InboundEvent) {
    let chat_id = cq.message.as_ref().map(|m| m.chat().id.0);
    let sender = chat_id.map(|chat_id| Sender {
        participant_id: cq.from.id.0.to_string(),
        chat_id,
        display_name: cq.from.full_name(),
    });

    let event = InboundEvent::Callback {
        callback_id: cq.id.clone(),
        payload: cq.data.clone().unwrap_or_default(),
    };

    (sender, event)
}
