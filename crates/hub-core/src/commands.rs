//! Chat command interpreter.
//!
//! Each inbound message is interpreted on its own: parse into a `ChatCommand`,
//! derive the `Mutation` it implies (if any), apply it, render the reply.

use crate::{
    formatting::{item_html, render_list_html, HELP_HTML},
    shopping::{Mutation, MutationOutcome, ShoppingService},
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatCommand {
    Start,
    List,
    Add(String),
    Done(String),
    Remove(String),
    Clear,
    ClearAll,
    /// Text without a leading `/` is an item to add.
    Plain(String),
    /// Unrecognized `/command`; ignored without a reply.
    Unknown(String),
}

impl ChatCommand {
    /// Parse one message. Blank messages yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if !text.starts_with('/') {
            return Some(Self::Plain(text.to_string()));
        }

        let (name, arg) = split_command(text);
        let cmd = match name.as_str() {
            "start" => Self::Start,
            "list" => Self::List,
            "add" => Self::Add(arg),
            "done" => Self::Done(arg),
            "remove" => Self::Remove(arg),
            "clear" => Self::Clear,
            "clearall" => Self::ClearAll,
            _ => Self::Unknown(name),
        };
        Some(cmd)
    }

    /// The list mutation this command asks for, attributed to `sender`.
    pub fn mutation(&self, sender: &str) -> Option<Mutation> {
        match self {
            Self::Add(text) | Self::Plain(text) if !text.is_empty() => Some(Mutation::Add {
                text: text.clone(),
                added_by: sender.to_string(),
            }),
            Self::Done(text) if !text.is_empty() => Some(Mutation::MarkDone { text: text.clone() }),
            Self::Remove(text) if !text.is_empty() => Some(Mutation::Remove { text: text.clone() }),
            Self::Clear => Some(Mutation::ClearChecked),
            Self::ClearAll => Some(Mutation::ClearAll),
            Self::Start
            | Self::List
            | Self::Add(_)
            | Self::Plain(_)
            | Self::Done(_)
            | Self::Remove(_)
            | Self::Unknown(_) => None,
        }
    }
}

fn split_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// Reply for a command whose mutation (if any) produced `outcome`.
fn reply_for(cmd: &ChatCommand, outcome: Option<&MutationOutcome>) -> Option<String> {
    let reply = match (cmd, outcome) {
        (ChatCommand::Add(_) | ChatCommand::Plain(_), Some(MutationOutcome::Added(item))) => {
            format!("✅ Lagt til: <b>{}</b>", item_html(&item.text))
        }
        (ChatCommand::Add(_), _) => "❌ Bruk: /add [vare]".to_string(),
        (ChatCommand::Done(text), Some(MutationOutcome::MarkedDone(Some(_)))) => {
            format!("✅ Markert som ferdig: <s>{}</s>", item_html(text))
        }
        (ChatCommand::Done(text), Some(_)) => format!("❌ Fant ikke: {}", item_html(text)),
        (ChatCommand::Done(_), None) => "❌ Bruk: /done [vare]".to_string(),
        (ChatCommand::Remove(text), Some(MutationOutcome::Removed(true))) => {
            format!("🗑️ Fjernet: {}", item_html(text))
        }
        (ChatCommand::Remove(text), Some(_)) => format!("❌ Fant ikke: {}", item_html(text)),
        (ChatCommand::Remove(_), None) => "❌ Bruk: /remove [vare]".to_string(),
        (ChatCommand::Clear, _) => "🧹 Fjernet alle ferdige varer!".to_string(),
        (ChatCommand::ClearAll, _) => "🗑️ Handlelisten er nå tom!".to_string(),
        (ChatCommand::Start, _) => HELP_HTML.to_string(),
        (ChatCommand::Plain(_), _) | (ChatCommand::List, _) | (ChatCommand::Unknown(_), _) => {
            return None
        }
    };
    Some(reply)
}

/// Runs chat commands against the shared list.
#[derive(Clone)]
pub struct CommandInterpreter {
    service: ShoppingService,
    list_title: String,
}

impl CommandInterpreter {
    pub fn new(service: ShoppingService, list_title: impl Into<String>) -> Self {
        Self {
            service,
            list_title: list_title.into(),
        }
    }

    /// Handle one message from `sender`; `Ok(None)` means "send nothing".
    pub async fn handle(&self, text: &str, sender: &str) -> Result<Option<String>> {
        let Some(cmd) = ChatCommand::parse(text) else {
            return Ok(None);
        };

        if cmd == ChatCommand::List {
            let list = self.service.snapshot().await?;
            return Ok(Some(render_list_html(&self.list_title, &list)));
        }

        let outcome = match cmd.mutation(sender) {
            Some(m) => Some(self.service.apply(m).await?),
            None => None,
        };
        Ok(reply_for(&cmd, outcome.as_ref()))
    }
}
