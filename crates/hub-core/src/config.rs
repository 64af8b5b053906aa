use std::{
    env, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Upper bound for `TELEGRAM_POLL_TIMEOUT`, in seconds.
pub const MAX_POLL_TIMEOUT_SECS: u64 = 3600;

/// Typed configuration for the hub process.
#[derive(Clone, Debug)]
pub struct Config {
    // Storage
    pub shopping_list_file: PathBuf,
    pub shopping_list_title: String,

    // HTTP
    pub http_bind_addr: SocketAddr,

    // Telegram
    pub telegram_bot_token: Option<String>,
    pub telegram_allowed_chats: Vec<i64>,
    pub telegram_poll_timeout: Duration,
    pub telegram_retry_delay: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let shopping_list_file = env_path("SHOPPING_LIST_FILE")
            .unwrap_or_else(|| PathBuf::from("data/shopping_list.json"));
        let shopping_list_title = env_str("SHOPPING_LIST_TITLE")
            .and_then(non_empty)
            .unwrap_or_else(|| "Handleliste W56".to_string());

        let raw_addr = env_str("HTTP_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string());
        let http_bind_addr = raw_addr.trim().parse::<SocketAddr>().map_err(|e| {
            Error::Config(format!("HTTP_BIND_ADDR is not a socket address ({raw_addr}): {e}"))
        })?;

        // The bot is optional: without a token the dashboard API still runs.
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").and_then(non_empty);
        let telegram_allowed_chats = parse_csv_i64(env_str("TELEGRAM_ALLOWED_CHATS"));
        let telegram_poll_timeout = poll_timeout_from(env_u64("TELEGRAM_POLL_TIMEOUT"));
        let telegram_retry_delay =
            Duration::from_millis(env_u64("TELEGRAM_RETRY_DELAY_MS").unwrap_or(1000));

        Ok(Self {
            shopping_list_file,
            shopping_list_title,
            http_bind_addr,
            telegram_bot_token,
            telegram_allowed_chats,
            telegram_poll_timeout,
            telegram_retry_delay,
        })
    }
}

/// Long-poll timeout in seconds, kept within `1..=MAX_POLL_TIMEOUT_SECS`.
fn poll_timeout_from(secs: Option<u64>) -> Duration {
    Duration::from_secs(secs.unwrap_or(30).clamp(1, MAX_POLL_TIMEOUT_SECS))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim().to_string())
    }
}
