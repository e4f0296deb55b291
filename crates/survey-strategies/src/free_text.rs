//! Free-text question strategy (spec.md §4.3).

use survey_core::error::Result;
use survey_core::record::Record;
use survey_core::strategy::{AnswerContext, AnswerInput, AnswerResult, PromptSpec, QuestionStrategy, RenderContext};
use survey_port::Markup;

pub const NAME: &str = "text";

pub struct FreeTextStrategy;

impl QuestionStrategy for FreeTextStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&self, _section_id: &str, _question: &survey_core::schema::Question) -> Result<()> {
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, _record: &Record) -> Result<PromptSpec> {
        Ok(PromptSpec {
            text: ctx.question.prompt.clone(),
            markup: Markup::None,
            force_new: false,
        })
    }

    fn handle_answer(
        &self,
        ctx: &AnswerContext<'_>,
        record: &mut Record,
        input: AnswerInput,
    ) -> Result<AnswerResult> {
        let text = match input {
            AnswerInput::Text(t) => t,
            AnswerInput::Callback(_) => {
                return Ok(AnswerResult::repeat_with_feedback(
                    "Please reply with text for this question.",
                ));
            }
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(AnswerResult::repeat_with_feedback("Please send a non-empty answer."));
        }

        record.data.insert(ctx.question.store_key.clone(), trimmed.to_string());
        Ok(AnswerResult::advance())
    }
}
