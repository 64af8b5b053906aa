//! Formatting utilities (Telegram HTML rendering of the list and bot replies).

use chrono::NaiveDateTime;

use crate::shopping::ShoppingList;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Telegram rejects messages longer than this.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Item text longer than this is cut when shown in chat.
const MAX_ITEM_DISPLAY_CHARS: usize = 500;

/// Escaped item text for chat output, cut to a displayable length.
pub fn item_html(text: &str) -> String {
    if text.chars().count() <= MAX_ITEM_DISPLAY_CHARS {
        return escape_html(text);
    }
    let cut: String = text.chars().take(MAX_ITEM_DISPLAY_CHARS).collect();
    format!("{}…", escape_html(&cut))
}

/// Split `html` into messages of at most `limit` chars, breaking between lines.
///
/// Every line rendered here closes its own tags, so each chunk stays valid
/// HTML. A single line over the limit is cut at char boundaries.
pub fn split_html_lines(html: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if html.chars().count() <= limit {
        return vec![html.to_string()];
    }

    let mut out = Vec::new();
    let mut lines: Vec<&str> = Vec::new();
    let mut len = 0usize;

    for line in html.split('\n') {
        let line_len = line.chars().count();
        let joined = if lines.is_empty() {
            line_len
        } else {
            len + 1 + line_len
        };
        if joined <= limit {
            lines.push(line);
            len = joined;
            continue;
        }

        flush_lines(&mut out, &mut lines);
        len = 0;
        if line_len <= limit {
            lines.push(line);
            len = line_len;
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        for piece in chars.chunks(limit) {
            out.push(piece.iter().collect());
        }
    }

    flush_lines(&mut out, &mut lines);
    out
}

fn flush_lines(out: &mut Vec<String>, lines: &mut Vec<&str>) {
    let msg = lines.join("\n");
    lines.clear();
    let msg = msg.trim_matches('\n');
    if !msg.trim().is_empty() {
        out.push(msg.to_string());
    }
}

pub const HELP_HTML: &str = "👋 Hei!\n\n\
<b>Her er noen nyttige kommandoer:</b>\n\
[vare] - Legg til vare\n\
/list - Se handlelisten\n\
/done [vare] - Merk som ferdig\n\
/remove [vare] - Fjern vare\n\
/clear - Fjern ferdige varer\n\
/clearall - Tøm hele listen";

/// Minute-precision stamp shown under the list.
pub fn format_last_updated(ts: Option<NaiveDateTime>) -> String {
    match ts {
        Some(ts) => ts.format("%Y-%m-%dT%H:%M").to_string(),
        None => "aldri".to_string(),
    }
}

/// Render the list: open items first, then checked ones struck through.
pub fn render_list_html(title: &str, list: &ShoppingList) -> String {
    if list.is_empty() {
        return "🛒 <b>Handlelisten er tom!</b>\n\nBruk /add [vare] for å legge til.".to_string();
    }

    let mut msg = format!("🛒 <b>{}</b>\n\n", escape_html(title));

    for item in list.unchecked() {
        msg.push_str(&format!("• {}\n", item_html(&item.text)));
    }

    let mut checked = list.checked().peekable();
    if checked.peek().is_some() {
        msg.push_str("\n<s>Ferdig:</s>\n");
        for item in checked {
            msg.push_str(&format!("<s>• {}</s>\n", item_html(&item.text)));
        }
    }

    msg.push_str(&format!(
        "\n<i>Sist oppdatert: {}</i>",
        format_last_updated(list.last_updated)
    ));
    msg
}
