//! `OutboundPort` implementation backed by a `teloxide::Bot`.
//!
//! Grounded on `skynet-telegram::send::send_response`'s send-and-map-errors
//! shape, generalized from "chunk and send plain text" to "send/edit with
//! structured markup", since the survey bot's messages are short prompts
//! rather than long LLM completions that need chunking.

use async_trait::async_trait;
use serde_json::Value;
use teloxide::payloads::{AnswerCallbackQuerySetters, EditMessageTextSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, MessageId, ReplyMarkup,
};

use survey_port::{CancelContext, InlineButton, Markup, MessageHandle, OutboundPort, TransportError};

use crate::error::map_request_error;

pub const TRANSPORT_TAG: &str = "telegram";

pub struct TelegramPort {
    bot: Bot,
}

impl TelegramPort {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn to_inline_keyboard(rows: &[Vec<InlineButton>]) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.text.clone(), b.callback_data.clone()))
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(buttons)
}

fn to_reply_keyboard(rows: &[Vec<String>]) -> KeyboardMarkup {
    let buttons: Vec<Vec<KeyboardButton>> =
        rows.iter().map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect()).collect();
    KeyboardMarkup::new(buttons).resize_keyboard()
}

/// Markup usable on a freshly sent message: any variant.
fn to_send_markup(markup: &Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::Inline(rows) => Some(ReplyMarkup::InlineKeyboard(to_inline_keyboard(rows))),
        Markup::ReplyKeyboard(rows) => Some(ReplyMarkup::Keyboard(to_reply_keyboard(rows))),
    }
}

/// Markup usable on an edited message: Telegram's `editMessageText` only
/// accepts an inline keyboard, never a persistent reply keyboard.
fn to_edit_markup(markup: &Markup) -> Result<Option<InlineKeyboardMarkup>, TransportError> {
    match markup {
        Markup::None => Ok(None),
        Markup::Inline(rows) => Ok(Some(to_inline_keyboard(rows))),
        Markup::ReplyKeyboard(_) => {
            Err(TransportError::BadPayload("cannot attach a reply keyboard to an edited message".to_string()))
        }
    }
}

#[async_trait]
impl OutboundPort for TelegramPort {
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

        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(reply_markup) = to_send_markup(&markup) {
            request = request.reply_markup(reply_markup);
        }

        let message = request.await.map_err(map_request_error)?;
        Ok(MessageHandle {
            chat_id,
            message_id: message.id.0 as i64,
            transport: TRANSPORT_TAG.to_string(),
            payload: text.to_string(),
            metadata: Value::Null,
        })
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

        let inline_markup = to_edit_markup(&markup)?;
        let mut request = self.bot.edit_message_text(ChatId(chat_id), MessageId(message_id as i32), text);
        if let Some(reply_markup) = inline_markup {
            request = request.reply_markup(reply_markup);
        }

        let message = request.await.map_err(map_request_error)?;
        Ok(MessageHandle {
            chat_id,
            message_id: message.id.0 as i64,
            transport: TRANSPORT_TAG.to_string(),
            payload: text.to_string(),
            metadata: Value::Null,
        })
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

        let mut request = self.bot.answer_callback_query(callback_id);
        if !text.is_empty() {
            request = request.text(text);
        }
        request.await.map_err(map_request_error)?;
        Ok(())
    }

    async fn delete(&self, ctx: &CancelContext, chat_id: i64, message_id: i64) -> Result<(), TransportError> {
        if let Some(err) = ctx.done_error() {
            return Err(err);
        }

        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id as i32))
            .await
            .map_err(map_request_error)?;
        Ok(())
    }
}
