use crate::domain::{ChatId, UpdateId};

/// One inbound update as returned by a long poll.
///
/// Updates that are not text messages (edits, joins, stickers) carry no
/// `message` but still advance the poll cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundUpdate {
    pub id: UpdateId,
    pub message: Option<InboundMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    /// Display name used for item attribution.
    pub sender_name: String,
    pub text: String,
}

/// Attribution for senders without a usable display name.
pub const UNKNOWN_SENDER: &str = "Ukjent";
