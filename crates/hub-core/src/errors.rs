use std::path::PathBuf;

/// Core error type for the shopping-list hub.
///
/// Adapter crates map their specific failures into this type so both entry points
/// (HTTP handlers and the bot loop) can tell client mistakes from storage faults.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid path: {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Storage faults: the durable record could not be read, written or encoded.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::Json(_) | Error::InvalidPath { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_classified() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(io.is_storage());
        assert!(!Error::InvalidInput("empty".to_string()).is_storage());
        assert!(!Error::Transport("timeout".to_string()).is_storage());
    }
}
