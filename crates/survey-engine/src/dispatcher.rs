//! Update dispatcher (spec.md §4.7): the single entry point every transport
//! adapter calls once per inbound event.
//!
//! Classification, staleness checks, and error recovery live here; the
//! actual prompt rendering and state transitions are delegated to
//! `record_flow`, `menu`, and `forward`.

use survey_core::config::TargetUser;
use survey_core::fsm::{MainMenuEvent, RecordEvent, RecordState};
use survey_core::schema::Schema;
use survey_core::strategy::{AnswerInput, StrategyResolver};
use survey_core::UserState;
use survey_port::{CancelContext, Markup, OutboundPort};

use crate::error::Result;
use crate::event::{InboundEvent, Sender};
use crate::forward::{self, ForwardKind};
use crate::labels;
use crate::payload::{self, ActionKind, CallbackPayload, ListNavKind};
use crate::record_flow::{self, IdleTrigger};
use crate::store::UserStateStore;

/// Prefix used when building/parsing `answer:` callback payloads.
pub const ANSWER_PREFIX: &str = "answer";

/// Dispatch one inbound event for one participant.
///
/// Events without a resolvable [`Sender`] are dropped (spec.md §4.7 step 1).
/// Any error from the per-event handler is caught here, logged, and turned
/// into a force-exit of the record FSM rather than propagated — the
/// participant only ever sees a generic apology (spec.md §7).
#[allow(clippy::too_many_arguments)]
pub async fn dispatch(
    ctx: &CancelContext,
    sender: Option<Sender>,
    event: InboundEvent,
    port: &dyn OutboundPort,
    schema: &Schema,
    resolver: &dyn StrategyResolver,
    store: &UserStateStore,
    target: &TargetUser,
    delete_user_messages: bool,
) -> Result<()> {
    let sender = match sender {
        Some(s) => s,
        None => {
            tracing::warn!("dropping inbound event with no resolvable sender");
            return Ok(());
        }
    };

    let entry = store.get_or_create(&sender.participant_id, &sender.display_name).await;
    let mut user = entry.lock().await;
    let chat_id = sender.chat_id;

    let outcome = route(&mut user, event, schema, resolver, target, chat_id, port, ctx, delete_user_messages).await;
    if let Err(err) = outcome {
        recover_from_error(&mut user, chat_id, port, ctx, &err).await;
    }
    Ok(())
}

async fn recover_from_error(
    user: &mut UserState,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
    err: &crate::error::EngineError,
) {
    tracing::warn!(code = err.code(), error = %err, "dispatch failed, forcing record session to idle");
    if user.record_fsm.fire(RecordEvent::ForceExit).is_ok() {
        let trigger = IdleTrigger::ForceExit { reason: err.code().to_string() };
        if let Err(inner) = record_flow::enter_record_idle(user, chat_id, port, ctx, trigger).await {
            tracing::warn!(error = %inner, "failed to render force-exit recovery message");
            return;
        }
        // spec.md §7: force-exit always shows the completion message "followed
        // by the main menu".
        if let Err(inner) = crate::menu::render_main_menu(user, chat_id, port, ctx).await {
            tracing::warn!(error = %inner, "failed to render main menu after force-exit");
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn route(
    user: &mut UserState,
    event: InboundEvent,
    schema: &Schema,
    resolver: &dyn StrategyResolver,
    target: &TargetUser,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
    delete_user_messages: bool,
) -> Result<()> {
    match event {
        InboundEvent::StartCommand => handle_start(user, chat_id, port, ctx).await,
        InboundEvent::Text { body, message_id } => {
            handle_text(user, &body, message_id, schema, resolver, target, chat_id, port, ctx, delete_user_messages)
                .await
        }
        InboundEvent::Callback { callback_id, payload } => {
            handle_callback(user, &callback_id, &payload, schema, resolver, target, chat_id, port, ctx).await
        }
    }
}

async fn handle_start(
    user: &mut UserState,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
) -> Result<()> {
    if user.record_fsm.state() != RecordState::RecordIdle {
        user.record_fsm.fire(RecordEvent::ForceExit).ok();
        let trigger = IdleTrigger::ForceExit { reason: "restarted".to_string() };
        record_flow::enter_record_idle(user, chat_id, port, ctx, trigger).await?;
    }
    user.main_menu.fire(MainMenuEvent::BackToIdle).ok();
    crate::menu::render_main_menu(user, chat_id, port, ctx).await
}

#[allow(clippy::too_many_arguments)]
async fn handle_text(
    user: &mut UserState,
    body: &str,
    message_id: i64,
    schema: &Schema,
    resolver: &dyn StrategyResolver,
    target: &TargetUser,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
    delete_user_messages: bool,
) -> Result<()> {
    match user.record_fsm.state() {
        RecordState::AnsweringQuestion => {
            let (section_id, section, question) = {
                let (s, sec, q) =
                    record_flow::current_question(user, schema).expect("position is valid while answering-question");
                (s.to_string(), sec.clone(), q.clone())
            };
            let strategy = resolver
                .resolve(&question.type_tag)
                .ok_or_else(|| survey_core::SurveyError::UnknownStrategy { name: question.type_tag.clone() })?;

            let mut draft = user.draft.take().unwrap_or_default();
            let answer_ctx = record_flow::answer_context(port, user, &section_id, &section, &question, chat_id, ANSWER_PREFIX, "");
            let outcome = strategy.handle_answer(&answer_ctx, &mut draft, AnswerInput::Text(body.to_string()));
            user.draft = Some(draft);
            let result = outcome?;

            if let Some(feedback) = &result.feedback {
                port.send(ctx, chat_id, feedback, Markup::None).await?;
            }

            let is_free_text = strategy.name() == survey_strategies::free_text::NAME;

            if result.advance {
                record_flow::progress_after_answer(user, schema, resolver, ANSWER_PREFIX, chat_id, port, ctx).await?;
            } else if result.repeat {
                record_flow::enter_answering_question(user, schema, resolver, ANSWER_PREFIX, chat_id, port, ctx).await?;
            }

            if delete_user_messages && is_free_text && message_id != 0 {
                if let Err(e) = port.delete(ctx, chat_id, message_id).await {
                    tracing::debug!(error = %e, "could not delete free-text answer message");
                }
            }
            Ok(())
        }
        RecordState::RecordIdle => match body {
            _ if body == labels::FILL_RECORD => {
                if user.record_fsm.fire(RecordEvent::StartRecord).is_ok() {
                    record_flow::enter_selecting_section(user, schema, chat_id, port, ctx).await
                } else {
                    Ok(())
                }
            }
            _ if body == labels::SHOW_RECORD => {
                user.main_menu.fire(MainMenuEvent::ViewList).ok();
                crate::menu::render_list_view(user, chat_id, port, ctx).await
            }
            _ if body == labels::SEND_TO_SELF => {
                forward::forward(user, schema, target, chat_id, ForwardKind::SelfForward, port, ctx).await?;
                Ok(())
            }
            _ if body == labels::SEND_TO_REVIEWER => {
                forward::forward(user, schema, target, chat_id, ForwardKind::ReviewerForward, port, ctx).await?;
                Ok(())
            }
            _ => {
                port.send(ctx, chat_id, "Please use the buttons below.", Markup::None).await?;
                Ok(())
            }
        },
        RecordState::SelectingSection => {
            port.send(ctx, chat_id, "Please use the buttons below.", Markup::None).await?;
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_callback(
    user: &mut UserState,
    callback_id: &str,
    raw_payload: &str,
    schema: &Schema,
    resolver: &dyn StrategyResolver,
    target: &TargetUser,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
) -> Result<()> {
    let decoded = payload::parse(raw_payload);

    let (ack_text, stale): (String, bool) = match &decoded {
        Some(CallbackPayload::Answer { question_id, .. }) => {
            let current = record_flow::current_question(user, schema).map(|(_, _, q)| q.id.clone());
            if current.as_deref() == Some(question_id.as_str()) {
                (String::new(), false)
            } else {
                ("That button belongs to a previous question.".to_string(), true)
            }
        }
        Some(_) => (String::new(), false),
        None => ("That action is no longer available.".to_string(), true),
    };

    port.acknowledge_callback(ctx, callback_id, &ack_text).await?;
    if stale {
        return Ok(());
    }
    let decoded = decoded.expect("stale=false implies a successful decode");

    match decoded {
        CallbackPayload::Answer { option_value, .. } => {
            let (section_id, section, question) = {
                let (s, sec, q) =
                    record_flow::current_question(user, schema).expect("checked current before acknowledging");
                (s.to_string(), sec.clone(), q.clone())
            };
            let strategy = resolver
                .resolve(&question.type_tag)
                .ok_or_else(|| survey_core::SurveyError::UnknownStrategy { name: question.type_tag.clone() })?;

            let mut draft = user.draft.take().unwrap_or_default();
            let answer_ctx =
                record_flow::answer_context(port, user, &section_id, &section, &question, chat_id, ANSWER_PREFIX, callback_id);
            let outcome = strategy.handle_answer(&answer_ctx, &mut draft, AnswerInput::Callback(option_value));
            user.draft = Some(draft);
            let result = outcome?;

            if let Some(feedback) = &result.feedback {
                port.send(ctx, chat_id, feedback, Markup::None).await?;
            }
            if result.advance {
                record_flow::progress_after_answer(user, schema, resolver, ANSWER_PREFIX, chat_id, port, ctx).await?;
            } else if result.repeat {
                record_flow::enter_answering_question(user, schema, resolver, ANSWER_PREFIX, chat_id, port, ctx).await?;
            }
            Ok(())
        }

        CallbackPayload::Section { section_id } => {
            if user.record_fsm.state() != RecordState::SelectingSection || schema.section(&section_id).is_none() {
                return Ok(());
            }
            user.current_section = Some(section_id);
            user.current_question_index = 0;
            if user.record_fsm.fire(RecordEvent::SelectSection).is_err() {
                return Ok(());
            }
            record_flow::enter_answering_question(user, schema, resolver, ANSWER_PREFIX, chat_id, port, ctx).await
        }

        CallbackPayload::Action(kind) => match kind {
            ActionKind::SaveRecord => {
                if user.record_fsm.fire(RecordEvent::SaveRecord).is_err() {
                    return Ok(());
                }
                record_flow::enter_record_idle(user, chat_id, port, ctx, IdleTrigger::Save).await?;
                crate::menu::render_main_menu(user, chat_id, port, ctx).await
            }
            ActionKind::CancelSection => {
                if user.record_fsm.fire(RecordEvent::CancelSection).is_err() {
                    return Ok(());
                }
                record_flow::enter_selecting_section(user, schema, chat_id, port, ctx).await
            }
            ActionKind::ExitMenu => {
                if user.record_fsm.fire(RecordEvent::ExitToMenu).is_err() {
                    return Ok(());
                }
                record_flow::enter_record_idle(user, chat_id, port, ctx, IdleTrigger::ExitToMenu).await?;
                crate::menu::render_main_menu(user, chat_id, port, ctx).await
            }
            ActionKind::ShareLast => {
                forward::forward(user, schema, target, chat_id, ForwardKind::SelfForward, port, ctx).await?;
                Ok(())
            }
            ActionKind::NewRecord => {
                if user.record_fsm.state() != RecordState::RecordIdle {
                    return Ok(());
                }
                if user.record_fsm.fire(RecordEvent::StartRecord).is_err() {
                    return Ok(());
                }
                record_flow::enter_selecting_section(user, schema, chat_id, port, ctx).await
            }
        },

        CallbackPayload::ListNav(nav) => match nav {
            ListNavKind::Next => {
                crate::menu::list_next(user);
                crate::menu::render_list_view(user, chat_id, port, ctx).await
            }
            ListNavKind::Back => {
                crate::menu::list_back(user);
                crate::menu::render_list_view(user, chat_id, port, ctx).await
            }
            ListNavKind::ToMenu => {
                user.main_menu.fire(MainMenuEvent::BackToIdle).ok();
                crate::menu::render_main_menu(user, chat_id, port, ctx).await
            }
        },
    }
}
