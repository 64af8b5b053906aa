use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use hub_core::Error;

/// `{ "success": false, "error": ... }` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": message.into(),
        })),
    )
        .into_response()
}

/// Map a core error: bad input is the caller's fault, everything else is ours.
pub fn core_error_to_response(err: Error) -> Response {
    match err {
        Error::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        e if e.is_storage() => {
            tracing::error!(error = %e, "shopping list storage failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Shopping list storage failed",
            )
        }
        other => {
            tracing::error!(error = %other, "shopping list request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_and_other_failures_are_server_errors() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(
            core_error_to_response(io).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            core_error_to_response(Error::Transport("down".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            core_error_to_response(Error::InvalidInput("empty".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
