//! Record FSM driver (spec.md §4.6): the side effects that accompany each
//! `RecordFsm` transition. The FSM table itself lives in `survey-core`; this
//! module renders prompts and mutates `UserState` around it.

use survey_core::fsm::RecordEvent;
use survey_core::schema::Schema;
use survey_core::strategy::{AnswerContext, RenderContext, StrategyResolver};
use survey_core::UserState;
use survey_port::{CancelContext, InlineButton, Markup, OutboundPort};

use crate::error::Result;
use crate::payload::{self, ActionKind};
use crate::render::send_or_edit;

pub const SAVE_LABEL: &str = "Save record";
pub const EXIT_LABEL: &str = "Exit to menu";
pub const CANCEL_LABEL: &str = "Cancel";
const CANCEL_PAYLOAD: &str = "action:cancel_section";

const SECTION_PROMPT: &str = "Choose a section to fill in, or save / exit.";

/// Why the record FSM is entering `record-idle` — drives which completion
/// message is shown and whether the draft is finalized (spec.md §4.6
/// "Entering record-idle").
pub enum IdleTrigger {
    Save,
    ExitToMenu,
    ForceExit { reason: String },
}

/// Render the section-selection keyboard and send/edit it (spec.md §4.6
/// "Entering selecting-section").
pub async fn enter_selecting_section(
    user: &mut UserState,
    schema: &Schema,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
) -> Result<()> {
    let mut markup = Markup::None;
    for section_id in schema.section_ids_in_order() {
        let section = schema.section(section_id).expect("section id enumerated from this schema");
        let answered = user
            .draft
            .as_ref()
            .map(|draft| section.questions.iter().any(|q| draft.get(&q.store_key).is_some()))
            .unwrap_or(false);
        let label = if answered { format!("{} \u{2713}", section.title) } else { section.title.clone() };
        markup.push_row(vec![InlineButton::new(label, payload::build_section(section_id))]);
    }
    markup.push_row(vec![
        InlineButton::new(SAVE_LABEL, payload::build_action(ActionKind::SaveRecord)),
        InlineButton::new(EXIT_LABEL, payload::build_action(ActionKind::ExitMenu)),
    ]);

    let previous = user.last_prompt.clone();
    let handle = send_or_edit(port, ctx, chat_id, &previous, SECTION_PROMPT, markup, false).await?;
    user.last_prompt = Some(handle);
    Ok(())
}

/// Resolve the current question's strategy, render its prompt, append the
/// trailing cancel row, and send/edit it (spec.md §4.6 "Entering
/// answering-question").
pub async fn enter_answering_question(
    user: &mut UserState,
    schema: &Schema,
    resolver: &dyn StrategyResolver,
    callback_prefix: &str,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
) -> Result<()> {
    let section_id = user
        .current_section
        .clone()
        .expect("current_section is set while answering-question");
    let section = schema.section(&section_id).expect("current_section names a real section");
    let question = section
        .questions
        .get(user.current_question_index)
        .expect("current_question_index is valid while answering-question");

    let strategy = resolver
        .resolve(&question.type_tag)
        .ok_or_else(|| survey_core::SurveyError::UnknownStrategy { name: question.type_tag.clone() })?;

    let draft = user.draft.clone().unwrap_or_default();
    let render_ctx = RenderContext {
        port,
        last_message_id: user.last_message_id(),
        chat_id,
        user,
        section_id: &section_id,
        section,
        question,
        callback_prefix,
    };
    let mut spec = strategy.render(&render_ctx, &draft)?;
    spec.markup.push_row(vec![InlineButton::new(CANCEL_LABEL, CANCEL_PAYLOAD)]);

    let previous = user.last_prompt.clone();
    let handle = send_or_edit(port, ctx, chat_id, &previous, &spec.text, spec.markup, spec.force_new).await?;
    user.last_prompt = Some(handle);
    Ok(())
}

/// Build an [`AnswerContext`] for the current question, for the dispatcher
/// to hand to `handle_answer`.
pub fn current_question<'a>(
    user: &'a UserState,
    schema: &'a Schema,
) -> Option<(&'a str, &'a survey_core::schema::Section, &'a survey_core::schema::Question)> {
    let section_id = user.current_section.as_deref()?;
    let section = schema.section(section_id)?;
    let question = section.questions.get(user.current_question_index)?;
    Some((section_id, section, question))
}

pub fn answer_context<'a>(
    port: &'a dyn OutboundPort,
    user: &'a UserState,
    section_id: &'a str,
    section: &'a survey_core::schema::Section,
    question: &'a survey_core::schema::Question,
    chat_id: i64,
    callback_prefix: &'a str,
    callback_id: &'a str,
) -> AnswerContext<'a> {
    AnswerContext {
        render: RenderContext {
            port,
            last_message_id: user.last_message_id(),
            chat_id,
            user,
            section_id,
            section,
            question,
            callback_prefix,
        },
        callback_id,
    }
}

/// Advance to the next question in the current section, or fire
/// `section-complete` when the section is exhausted (spec.md §4.6 "Answer
/// progression"). Falls back to direct re-entry if the FSM refuses the
/// self-loop.
pub async fn progress_after_answer(
    user: &mut UserState,
    schema: &Schema,
    resolver: &dyn StrategyResolver,
    callback_prefix: &str,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
) -> Result<()> {
    let section_id = user.current_section.clone().expect("set while answering-question");
    let section = schema.section(&section_id).expect("current_section names a real section");
    let i = user.current_question_index;

    if i + 1 < section.questions.len() {
        user.current_question_index = i + 1;
        user.record_fsm.fire_or_reenter(RecordEvent::AnswerQuestion);
        enter_answering_question(user, schema, resolver, callback_prefix, chat_id, port, ctx).await
    } else {
        user.current_section = None;
        user.current_question_index = 0;
        user.record_fsm.fire_or_reenter(RecordEvent::SectionComplete);
        enter_selecting_section(user, schema, chat_id, port, ctx).await
    }
}

/// Finalize the record-idle transition: per `trigger`, update the draft and
/// position bookkeeping, then show a completion message and the main menu
/// (spec.md §4.6 "Entering record-idle"). Caller is responsible for firing
/// the FSM event itself; rendering the main menu is the caller's job too
/// (`survey-engine::menu`), since main-menu rendering does not belong to the
/// record FSM.
pub async fn enter_record_idle(
    user: &mut UserState,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
    trigger: IdleTrigger,
) -> Result<()> {
    let completion_text = match &trigger {
        IdleTrigger::Save => {
            let id = user.next_record_id();
            let now = chrono::Utc::now();
            if let Some(mut draft) = user.draft.take() {
                draft.finalize(id, now);
                user.records.push(draft);
            }
            "Record saved. Thank you!".to_string()
        }
        IdleTrigger::ExitToMenu => "Back to the main menu.".to_string(),
        IdleTrigger::ForceExit { reason } => {
            format!("An error occurred ({reason}). Input interrupted. Draft saved.")
        }
    };

    user.clear_position();

    let previous = user.last_prompt.clone();
    send_or_edit(port, ctx, chat_id, &previous, &completion_text, Markup::None, false).await?;
    user.last_prompt = None;
    Ok(())
}
