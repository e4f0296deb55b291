//! Multi-step compound question strategy: free text followed by a rating,
//! repeatable via "next"/"finish" (spec.md §4.3).
//!
//! Progression state is kept in the draft's reserved `_`-prefixed keys
//! (`schema::RESERVED_KEY_PREFIX`) rather than anywhere on `UserState`, so a
//! crash between steps leaves the in-progress entry recoverable from the
//! draft alone.

use survey_core::error::{Result, SurveyError};
use survey_core::record::Record;
use survey_core::schema::Question;
use survey_core::strategy::{AnswerContext, AnswerInput, AnswerResult, PromptSpec, QuestionStrategy, RenderContext};
use survey_port::{InlineButton, Markup};

pub const NAME: &str = "compound";

const DEFAULT_RATING_MIN: u32 = 1;
const DEFAULT_RATING_MAX: u32 = 10;
const MAX_RATING_CEILING: u32 = 20;

const STEP_TEXT: &str = "text";
const STEP_RATING: &str = "rating";
const STEP_CONTINUE: &str = "continue";

const NEXT_VALUE: &str = "next";
const FINISH_VALUE: &str = "finish";

fn step_key(question_id: &str) -> String {
    format!("_compound_step:{question_id}")
}

fn pending_text_key(question_id: &str) -> String {
    format!("_compound_text:{question_id}")
}

#[derive(Default)]
pub struct CompoundStrategy;

impl CompoundStrategy {
    pub fn new() -> Self {
        Self
    }

    fn rating_range(question: &Question) -> (u32, u32) {
        (
            question.rating_min.unwrap_or(DEFAULT_RATING_MIN),
            question.rating_max.unwrap_or(DEFAULT_RATING_MAX),
        )
    }

    fn current_step(record: &Record, question_id: &str) -> String {
        record
            .data
            .get(&step_key(question_id))
            .cloned()
            .unwrap_or_else(|| STEP_TEXT.to_string())
    }

    fn rating_markup(ctx: &RenderContext<'_>, min: u32, max: u32) -> Markup {
        let mut markup = Markup::None;
        for n in min..=max {
            let payload = format!("{}:{}:{n}", ctx.callback_prefix, ctx.question.id);
            markup.push_row(vec![InlineButton::new(n.to_string(), payload)]);
        }
        markup
    }

    fn continue_markup(ctx: &RenderContext<'_>) -> Markup {
        let next_label = ctx.question.next_button_label.clone().unwrap_or_else(|| "Next".to_string());
        let finish_label = ctx
            .question
            .finish_button_label
            .clone()
            .unwrap_or_else(|| "Finish".to_string());
        let next_payload = format!("{}:{}:{NEXT_VALUE}", ctx.callback_prefix, ctx.question.id);
        let finish_payload = format!("{}:{}:{FINISH_VALUE}", ctx.callback_prefix, ctx.question.id);
        Markup::Inline(vec![vec![
            InlineButton::new(next_label, next_payload),
            InlineButton::new(finish_label, finish_payload),
        ]])
    }

    fn append_entry(record: &mut Record, store_key: &str, text: &str, rating: u32) {
        let entry = format!("- {text}\n  Rating: {rating}");
        match record.data.get(store_key) {
            Some(existing) if !existing.is_empty() => {
                let combined = format!("{existing}\n{entry}");
                record.data.insert(store_key.to_string(), combined);
            }
            _ => {
                record.data.insert(store_key.to_string(), entry);
            }
        }
    }

    fn clear_progress(record: &mut Record, question_id: &str) {
        record.data.remove(&step_key(question_id));
        record.data.remove(&pending_text_key(question_id));
    }
}

impl QuestionStrategy for CompoundStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&self, section_id: &str, question: &Question) -> Result<()> {
        let (min, max) = Self::rating_range(question);
        if min < 1 || max > MAX_RATING_CEILING || min > max {
            return Err(SurveyError::SchemaValidation {
                section: section_id.to_string(),
                question: question.id.clone(),
                reason: format!(
                    "strategy '{NAME}' requires 1 <= rating_min <= rating_max <= {MAX_RATING_CEILING}, got {min}..={max}"
                ),
            });
        }
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, record: &Record) -> Result<PromptSpec> {
        let step = Self::current_step(record, &ctx.question.id);
        let spec = match step.as_str() {
            STEP_RATING => {
                let (min, max) = Self::rating_range(ctx.question);
                PromptSpec {
                    text: format!("Rate it from {min} to {max}:"),
                    markup: Self::rating_markup(ctx, min, max),
                    force_new: false,
                }
            }
            STEP_CONTINUE => PromptSpec {
                text: "Add another entry, or finish this question?".to_string(),
                markup: Self::continue_markup(ctx),
                force_new: false,
            },
            _ => PromptSpec {
                text: ctx.question.prompt.clone(),
                markup: Markup::None,
                force_new: false,
            },
        };
        Ok(spec)
    }

    fn handle_answer(
        &self,
        ctx: &AnswerContext<'_>,
        record: &mut Record,
        input: AnswerInput,
    ) -> Result<AnswerResult> {
        let question_id = ctx.question.id.clone();
        let step = Self::current_step(record, &question_id);

        match step.as_str() {
            STEP_TEXT => {
                let text = match input {
                    AnswerInput::Text(t) => t,
                    AnswerInput::Callback(_) => {
                        return Ok(AnswerResult::repeat_with_feedback(
                            "Please reply with text for this entry.",
                        ));
                    }
                };
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(AnswerResult::repeat_with_feedback("Please send a non-empty answer."));
                }
                record.data.insert(pending_text_key(&question_id), trimmed.to_string());
                record.data.insert(step_key(&question_id), STEP_RATING.to_string());
                Ok(AnswerResult::repeat())
            }
            STEP_RATING => {
                let value = match input {
                    AnswerInput::Callback(v) => v,
                    AnswerInput::Text(_) => {
                        return Ok(AnswerResult::repeat_with_feedback("Please choose a rating button."));
                    }
                };
                let (min, max) = Self::rating_range(ctx.question);
                let rating: Option<u32> = value.parse().ok();
                let in_range = rating.map(|r| r >= min && r <= max).unwrap_or(false);
                if !in_range {
                    return Ok(AnswerResult::repeat_with_feedback(
                        "That rating is no longer valid, please choose again.",
                    ));
                }
                let rating = rating.unwrap();
                let text = record.data.get(&pending_text_key(&question_id)).cloned().unwrap_or_default();
                Self::append_entry(record, &ctx.question.store_key, &text, rating);
                record.data.remove(&pending_text_key(&question_id));
                record.data.insert(step_key(&question_id), STEP_CONTINUE.to_string());
                Ok(AnswerResult::repeat())
            }
            STEP_CONTINUE => {
                let value = match input {
                    AnswerInput::Callback(v) => v,
                    AnswerInput::Text(_) => {
                        return Ok(AnswerResult::repeat_with_feedback(
                            "Please choose \"Next\" or \"Finish\" above.",
                        ));
                    }
                };
                match value.as_str() {
                    NEXT_VALUE => {
                        record.data.insert(step_key(&question_id), STEP_TEXT.to_string());
                        Ok(AnswerResult::repeat())
                    }
                    FINISH_VALUE => {
                        Self::clear_progress(record, &question_id);
                        Ok(AnswerResult::advance())
                    }
                    _ => Ok(AnswerResult::repeat_with_feedback(
                        "That button is no longer valid, please choose again.",
                    )),
                }
            }
            other => Err(SurveyError::Strategy(format!("unknown compound step marker '{other}'"))),
        }
    }
}
