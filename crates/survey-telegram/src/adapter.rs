//! Telegram channel adapter: wraps a `teloxide::Bot` + `Dispatcher` and
//! drives the long-polling event loop until the process exits.
//!
//! Grounded on `skynet-telegram::adapter::TelegramAdapter`'s shape (a
//! struct holding the shared context, with a `run` that builds the handler
//! tree and calls `Dispatcher::builder(..).build().dispatch()`), generalized
//! from a single message-only handler to a two-branch tree (messages and
//! callback queries) since this bot's UI is button-driven.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::info;

use survey_core::config::TargetUser;
use survey_core::schema::Schema;
use survey_engine::UserStateStore;
use survey_port::CancelContext;
use survey_strategies::Registry;

use crate::convert;
use crate::port::TelegramPort;

/// Shared, cloneable dependencies injected into every handler invocation.
#[derive(Clone)]
pub struct SurveyDeps {
    pub schema: Arc<Schema>,
    pub resolver: Arc<Registry>,
    pub store: Arc<UserStateStore>,
    pub target: Arc<TargetUser>,
    pub port: Arc<TelegramPort>,
    pub ctx: CancelContext,
    pub delete_user_messages: bool,
}

pub struct TelegramAdapter {
    bot: Bot,
    deps: SurveyDeps,
}

impl TelegramAdapter {
    pub fn new(bot_token: &str, deps: SurveyDeps) -> Self {
        Self { bot: Bot::new(bot_token), deps }
    }

    /// Connect to Telegram and drive the long-polling loop. Never returns —
    /// runs for the lifetime of the process.
    pub async fn run(self) {
        info!("Telegram: starting long-polling dispatcher");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handle_message))
            .branch(Update::filter_callback_query().endpoint(handle_callback_query));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.deps])
            .default_handler(|_upd| async {})
            .build()
            .dispatch()
            .await;
    }
}

async fn handle_message(msg: Message, deps: SurveyDeps) -> ResponseResult<()> {
    if msg.from.as_ref().map(|u| u.is_bot).unwrap_or(false) {
        return Ok(());
    }
    let (sender, event) = convert::from_message(&msg);
    dispatch_event(&deps, sender, event).await;
    Ok(())
}

async fn handle_callback_query(cq: CallbackQuery, deps: SurveyDeps) -> ResponseResult<()> {
    let (sender, event) = convert::from_callback_query(&cq);
    dispatch_event(&deps, sender, event).await;
    Ok(())
}

async fn dispatch_event(deps: &SurveyDeps, sender: Option<survey_engine::Sender>, event: survey_engine::InboundEvent) {
    let outcome = survey_engine::dispatch(
        &deps.ctx,
        sender,
        event,
        deps.port.as_ref(),
        deps.schema.as_ref(),
        deps.resolver.as_ref(),
        deps.store.as_ref(),
        deps.target.as_ref(),
        deps.delete_user_messages,
    )
    .await;

    if let Err(err) = outcome {
        tracing::error!(error = %err, "unrecoverable dispatch error");
    }
}
