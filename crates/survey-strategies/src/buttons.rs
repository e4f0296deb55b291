//! Single-choice inline-button question strategy (spec.md §4.3).

use survey_core::error::{Result, SurveyError};
use survey_core::record::Record;
use survey_core::schema::Question;
use survey_core::strategy::{AnswerContext, AnswerInput, AnswerResult, PromptSpec, QuestionStrategy, RenderContext};
use survey_port::{InlineButton, Markup};

pub const NAME: &str = "buttons";

pub struct ButtonChoiceStrategy;

impl QuestionStrategy for ButtonChoiceStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&self, section_id: &str, question: &Question) -> Result<()> {
        if question.options.is_empty() {
            return Err(SurveyError::SchemaValidation {
                section: section_id.to_string(),
                question: question.id.clone(),
                reason: format!("strategy '{NAME}' requires at least one option"),
            });
        }
        for opt in &question.options {
            if opt.text.trim().is_empty() || opt.value.trim().is_empty() {
                return Err(SurveyError::SchemaValidation {
                    section: section_id.to_string(),
                    question: question.id.clone(),
                    reason: "button option has an empty text or value".to_string(),
                });
            }
        }
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, _record: &Record) -> Result<PromptSpec> {
        let mut markup = Markup::None;
        for opt in &ctx.question.options {
            let payload = format!("{}:{}:{}", ctx.callback_prefix, ctx.question.id, opt.value);
            markup.push_row(vec![InlineButton::new(opt.text.clone(), payload)]);
        }
        Ok(PromptSpec {
            text: ctx.question.prompt.clone(),
            markup,
            force_new: false,
        })
    }

    fn handle_answer(
        &self,
        ctx: &AnswerContext<'_>,
        record: &mut Record,
        input: AnswerInput,
    ) -> Result<AnswerResult> {
        let value = match input {
            AnswerInput::Callback(v) => v,
            AnswerInput::Text(_) => {
                return Ok(AnswerResult::repeat_with_feedback(
                    "Please choose one of the buttons above.",
                ));
            }
        };

        let known = ctx.question.options.iter().any(|opt| opt.value == value);
        if !known {
            return Ok(AnswerResult::repeat_with_feedback(
                "That button is no longer valid for this question, please choose again.",
            ));
        }

        record.data.insert(ctx.question.store_key.clone(), value);
        Ok(AnswerResult::advance())
    }
}
