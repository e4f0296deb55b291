//! Structured, transport-opaque markup description.
//!
//! `Markup` is built by strategies/the engine and handed to the port as-is;
//! the port never inspects it — only the concrete adapter (e.g.
//! `survey-telegram`) knows how to serialize it onto the wire.

use serde::{Deserialize, Serialize};

/// A single inline button: display text plus an opaque callback payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Markup attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Markup {
    /// No markup — plain text message.
    #[default]
    None,
    /// An inline keyboard: an ordered list of rows, each an ordered list of buttons.
    Inline(Vec<Vec<InlineButton>>),
    /// A persistent reply keyboard: an ordered list of rows, each an ordered
    /// list of button labels. Unlike `Inline`, these carry no callback
    /// payload — tapping one sends its label as a plain text message.
    ReplyKeyboard(Vec<Vec<String>>),
}

impl Markup {
    pub fn is_empty(&self) -> bool {
        match self {
            Markup::None => true,
            Markup::Inline(rows) => rows.is_empty(),
            Markup::ReplyKeyboard(rows) => rows.is_empty(),
        }
    }

    /// Append one row to an inline keyboard, creating it if this was `None`.
    pub fn push_row(&mut self, row: Vec<InlineButton>) {
        match self {
            Markup::None => *self = Markup::Inline(vec![row]),
            Markup::Inline(rows) => rows.push(row),
            Markup::ReplyKeyboard(_) => panic!("cannot push an inline row onto a reply keyboard"),
        }
    }

    pub fn reply_keyboard(rows: Vec<Vec<String>>) -> Self {
        Markup::ReplyKeyboard(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_empty() {
        assert!(Markup::None.is_empty());
    }

    #[test]
    fn push_row_creates_inline() {
        let mut m = Markup::None;
        m.push_row(vec![InlineButton::new("A", "a")]);
        assert!(!m.is_empty());
        assert!(matches!(m, Markup::Inline(ref rows) if rows.len() == 1));
    }
}
