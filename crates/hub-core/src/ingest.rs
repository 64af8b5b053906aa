//! Long-polling ingestion loop for the chat bot.
//!
//! The loop owns the poll cursor (`last_seen`). The cursor is advanced before a
//! message is handled, so a message that fails while being handled is never
//! fetched again by this loop.

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{
    commands::CommandInterpreter,
    config::Config,
    domain::UpdateId,
    formatting::{split_html_lines, TELEGRAM_MESSAGE_LIMIT},
    messaging::{
        port::BotTransport,
        types::{InboundMessage, InboundUpdate},
    },
    security::is_chat_allowed,
    Result,
};

const FAILURE_NOTICE: &str = "⚠️ Noe gikk galt med handlelisten. Prøv igjen senere.";

#[derive(Clone, Debug)]
pub struct PollerConfig {
    pub poll_timeout: Duration,
    pub retry_delay: Duration,
    pub allowed_chats: Vec<i64>,
}

impl PollerConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            poll_timeout: cfg.telegram_poll_timeout,
            retry_delay: cfg.telegram_retry_delay,
            allowed_chats: cfg.telegram_allowed_chats.clone(),
        }
    }
}

pub struct Poller {
    transport: Arc<dyn BotTransport>,
    interpreter: CommandInterpreter,
    cfg: PollerConfig,
    last_seen: UpdateId,
}

impl Poller {
    pub fn new(
        transport: Arc<dyn BotTransport>,
        interpreter: CommandInterpreter,
        cfg: PollerConfig,
    ) -> Self {
        Self {
            transport,
            interpreter,
            cfg,
            last_seen: UpdateId::default(),
        }
    }

    pub fn last_seen(&self) -> UpdateId {
        self.last_seen
    }

    /// Poll until `cancel` fires. Transport failures are logged and retried
    /// after `retry_delay`; nothing ends the loop except cancellation.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            poll_timeout_secs = self.cfg.poll_timeout.as_secs(),
            "shopping bot polling started"
        );

        loop {
            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                res = self.poll_once() => res,
            };

            if let Err(e) = polled {
                tracing::warn!(
                    error = %e,
                    last_seen = self.last_seen.0,
                    "bot polling failed; retrying"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = sleep(self.cfg.retry_delay) => {}
                }
            }
        }

        tracing::info!(last_seen = self.last_seen.0, "shopping bot polling stopped");
    }

    /// One long poll plus handling of the returned batch.
    ///
    /// Only a failed fetch is returned as an error; per-message failures are
    /// logged and never abort the batch.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let updates = self
            .transport
            .get_updates(self.last_seen, self.cfg.poll_timeout)
            .await?;

        let count = updates.len();
        for update in updates {
            let InboundUpdate { id, message } = update;
            // Commit before handling: a poison message must not come back.
            self.last_seen = self.last_seen.max(id);

            let Some(message) = message else {
                continue;
            };
            self.dispatch(id, message).await;
        }
        Ok(count)
    }

    async fn dispatch(&self, id: UpdateId, message: InboundMessage) {
        if !is_chat_allowed(message.chat_id, &self.cfg.allowed_chats) {
            tracing::warn!(
                update_id = id.0,
                chat_id = message.chat_id.0,
                "ignoring message from chat outside the allowlist"
            );
            return;
        }

        let reply = match self
            .interpreter
            .handle(&message.text, &message.sender_name)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    update_id = id.0,
                    chat_id = message.chat_id.0,
                    error = %e,
                    "failed to apply chat command"
                );
                Some(FAILURE_NOTICE.to_string())
            }
        };

        let Some(reply) = reply else {
            return;
        };
        for chunk in split_html_lines(&reply, TELEGRAM_MESSAGE_LIMIT) {
            if let Err(e) = self.transport.send_html(message.chat_id, &chunk).await {
                tracing::warn!(
                    update_id = id.0,
                    chat_id = message.chat_id.0,
                    error = %e,
                    "failed to send bot reply"
                );
                break;
            }
        }
    }
}
