//! Bootstrap binary: wires config, schema, strategies, and the Telegram
//! transport together and runs the dispatcher loop forever.
//!
//! Grounded on `skynet-gateway::main`'s shape (init tracing, load config,
//! build shared state, build the transport, serve forever), generalized
//! from an HTTP listener to a long-polling chat transport.

use std::sync::Arc;

use teloxide::Bot;
use tracing::{info, warn};

use survey_core::config::{SurveyConfig, TargetUser};
use survey_core::schema;
use survey_engine::UserStateStore;
use survey_port::CancelContext;
use survey_strategies::Registry;
use survey_telegram::{SurveyDeps, TelegramAdapter, TelegramPort};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "survey_bot=info".into()),
        )
        .init();

    let config = SurveyConfig::load()?;
    let target = TargetUser::from_env();
    if !target.is_enabled() {
        warn!("TARGET_USER_ID is absent or zero; reviewer-forward is disabled");
    }

    let resolver = Registry::builtin();
    let schema = schema::load_from_path(&config.schema_path)?;
    schema::validate(&schema, &resolver)?;
    info!(path = %config.schema_path, sections = schema.sections().len(), "survey schema loaded");

    let store = UserStateStore::new();
    let bot = Bot::new(&config.bot_token);
    let port = TelegramPort::new(bot);

    let deps = SurveyDeps {
        schema: Arc::new(schema),
        resolver: Arc::new(resolver),
        store: Arc::new(store),
        target: Arc::new(target),
        port: Arc::new(port),
        ctx: CancelContext::background(),
        delete_user_messages: config.delete_user_messages,
    };

    info!("survey-bot starting");
    TelegramAdapter::new(&config.bot_token, deps).run().await;

    Ok(())
}
