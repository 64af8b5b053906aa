use std::time::Duration;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, UpdateId},
    messaging::types::InboundUpdate,
    Result,
};

/// Bot transport port.
///
/// Implementations map their network/API failures to `Error::Transport`; the
/// ingestion loop retries those forever.
#[async_trait]
pub trait BotTransport: Send + Sync {
    /// Long-poll for updates with ids greater than `after`, in arrival order.
    ///
    /// Returns an empty batch when `timeout` elapses without news.
    async fn get_updates(&self, after: UpdateId, timeout: Duration) -> Result<Vec<InboundUpdate>>;

    /// Send an HTML-formatted message to a chat.
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()>;
}
