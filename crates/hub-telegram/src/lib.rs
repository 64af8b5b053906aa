//! Telegram adapter (teloxide).
//!
//! This crate implements the `hub-core` BotTransport port over the Telegram Bot API.

use std::time::Duration;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{ParseMode, UpdateKind},
};

use tokio::time::sleep;

pub mod router;

use hub_core::{
    domain::{ChatId, UpdateId},
    errors::Error,
    messaging::{
        port::BotTransport,
        types::{InboundMessage, InboundUpdate, UNKNOWN_SENDER},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Transport(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

/// Telegram `offset` for "everything after `after`".
fn next_offset(after: UpdateId) -> i32 {
    i32::try_from(after.0.saturating_add(1)).unwrap_or(i32::MAX)
}

fn into_inbound(update: Update) -> InboundUpdate {
    let id = UpdateId(i64::from(update.id));
    let message = match update.kind {
        UpdateKind::Message(msg) => msg.text().map(|text| InboundMessage {
            chat_id: ChatId(msg.chat.id.0),
            sender_name: sender_name(msg.from().map(|u| u.first_name.as_str())),
            text: text.to_string(),
        }),
        _ => None,
    };
    InboundUpdate { id, message }
}

fn sender_name(first_name: Option<&str>) -> String {
    first_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_SENDER)
        .to_string()
}

#[async_trait]
impl BotTransport for TelegramTransport {
    async fn get_updates(&self, after: UpdateId, timeout: Duration) -> Result<Vec<InboundUpdate>> {
        let secs = u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX);
        let updates = self
            .bot
            .get_updates()
            .offset(next_offset(after))
            .timeout(secs)
            .await
            .map_err(Self::map_err)?;

        Ok(updates.into_iter().map(into_inbound).collect())
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.with_retry(|| {
            self.bot
                .send_message(Self::tg_chat(chat_id), html.to_string())
                .parse_mode(ParseMode::Html)
        })
        .await?;
        Ok(())
    }
}
