use std::{sync::Arc, time::Duration};

use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

use hub_core::{
    commands::CommandInterpreter,
    config::Config,
    ingest::{Poller, PollerConfig},
    messaging::port::BotTransport,
    shopping::ShoppingService,
};

use crate::TelegramTransport;

/// Slack on top of the long-poll timeout before the HTTP client gives up.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

/// Build a bot whose HTTP client outlives a long poll.
///
/// teloxide's default client times out well before a 30 s `getUpdates`.
pub fn build_bot(token: &str, poll_timeout: Duration) -> anyhow::Result<Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(poll_timeout.saturating_add(HTTP_TIMEOUT_SLACK))
        .build()?;
    Ok(Bot::with_client(token, client))
}

/// Run the shopping bot until `cancel` fires.
pub async fn run_polling(
    cfg: Arc<Config>,
    service: ShoppingService,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let Some(token) = cfg.telegram_bot_token.as_deref() else {
        anyhow::bail!("TELEGRAM_BOT_TOKEN is not set");
    };
    let bot = build_bot(token, cfg.telegram_poll_timeout)?;

    // Basic startup info; a failure here is not fatal, polling retries anyway.
    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "telegram bot started"),
        Err(e) => tracing::warn!(error = %e, "telegram get_me failed; polling anyway"),
    }
    if !cfg.telegram_allowed_chats.is_empty() {
        tracing::info!(
            allowed_chats = cfg.telegram_allowed_chats.len(),
            "telegram chat allowlist active"
        );
    }

    let transport: Arc<dyn BotTransport> = Arc::new(TelegramTransport::new(bot));
    let interpreter = CommandInterpreter::new(service, cfg.shopping_list_title.clone());
    let poller = Poller::new(transport, interpreter, PollerConfig::from_config(&cfg));

    poller.run(cancel).await;
    Ok(())
}
