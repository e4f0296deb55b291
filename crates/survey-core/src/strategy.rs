//! The question-strategy contract (spec.md §4.3 "Question-Strategy Registry").
//!
//! Defined in `survey-core` (rather than alongside the built-in
//! implementations in `survey-strategies`) so that schema validation —
//! which must resolve a question's type tag to a strategy and ask it to
//! validate itself — does not need to depend on the strategies crate.
//! `survey-strategies::Registry` implements [`StrategyResolver`] and is the
//! only thing that constructs trait objects behind it.

use survey_port::OutboundPort;

use crate::error::Result;
use crate::record::Record;
use crate::schema::tree::{Question, Section};
use crate::state::UserState;

/// Everything a strategy's `render` needs to describe the next prompt.
pub struct RenderContext<'a> {
    pub port: &'a dyn OutboundPort,
    /// `0` means there is no existing prompt to edit.
    pub last_message_id: i64,
    pub chat_id: i64,
    pub user: &'a UserState,
    pub section_id: &'a str,
    pub section: &'a Section,
    pub question: &'a Question,
    /// Prefix used when building `answer:` callback payloads, e.g. `"answer"`.
    pub callback_prefix: &'a str,
}

/// [`RenderContext`] plus the inbound-event-specific fields needed to
/// interpret an answer.
pub struct AnswerContext<'a> {
    pub render: RenderContext<'a>,
    /// Empty for free-text input.
    pub callback_id: &'a str,
}

impl<'a> std::ops::Deref for AnswerContext<'a> {
    type Target = RenderContext<'a>;
    fn deref(&self) -> &Self::Target {
        &self.render
    }
}

/// What a strategy wants rendered for the current question.
#[derive(Debug, Clone, Default)]
pub struct PromptSpec {
    pub text: String,
    pub markup: survey_port::Markup,
    /// When true, the caller must send a fresh message rather than edit.
    pub force_new: bool,
}

/// One inbound answer, tagged by source.
#[derive(Debug, Clone)]
pub enum AnswerInput {
    Text(String),
    Callback(String),
}

/// The verdict a strategy returns after processing one answer input
/// (spec.md §4.3 "Answer result").
#[derive(Debug, Clone, Default)]
pub struct AnswerResult {
    pub advance: bool,
    pub repeat: bool,
    pub feedback: Option<String>,
}

impl AnswerResult {
    pub fn advance() -> Self {
        Self { advance: true, ..Default::default() }
    }

    pub fn advance_with_feedback(feedback: impl Into<String>) -> Self {
        Self {
            advance: true,
            feedback: Some(feedback.into()),
            ..Default::default()
        }
    }

    pub fn repeat_with_feedback(feedback: impl Into<String>) -> Self {
        Self {
            repeat: true,
            feedback: Some(feedback.into()),
            ..Default::default()
        }
    }

    /// Re-render the current question with no feedback message, used by
    /// strategies that manage multi-step progression internally (e.g. the
    /// compound strategy moving from its text step to its rating step).
    pub fn repeat() -> Self {
        Self { repeat: true, ..Default::default() }
    }

    pub fn handled() -> Self {
        Self::default()
    }
}

/// The capability set every question type implements (spec.md §4.3).
///
/// Strategies never perform I/O; they only describe prompts and mutate the
/// draft's `data` map, which is why `render`/`handle_answer` take `record`
/// as a plain borrow/mutable borrow rather than bundling it into the
/// contexts above (that would force every context to carry a lifetime tied
/// to a single mutable borrow of the record, which the render path doesn't
/// need).
pub trait QuestionStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, section_id: &str, question: &Question) -> Result<()>;

    fn render(&self, ctx: &RenderContext<'_>, record: &Record) -> Result<PromptSpec>;

    fn handle_answer(
        &self,
        ctx: &AnswerContext<'_>,
        record: &mut Record,
        input: AnswerInput,
    ) -> Result<AnswerResult>;
}

/// Resolves a question's type tag to its strategy, used both by schema
/// validation and by the dispatcher at runtime.
pub trait StrategyResolver: Send + Sync {
    fn resolve(&self, type_tag: &str) -> Option<&dyn QuestionStrategy>;
}

/// Normalize a strategy name for registration/lookup: trimmed, lowercased
/// (spec.md §4.3).
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
