use axum::{body::Bytes, http::StatusCode, response::Response};
use serde::{de::DeserializeOwned, Deserialize};

use crate::errors::json_error;

#[derive(Debug, Default, Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub added_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveItemRequest {
    #[serde(default)]
    pub item: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub all: bool,
}

/// Parse an optional JSON body: empty (or `null`) means "no fields given".
pub fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    match serde_json::from_slice::<Option<T>>(body) {
        Ok(v) => Ok(v.unwrap_or_default()),
        Err(e) => Err(json_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid JSON body: {e}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_null_bodies_are_defaults() {
        let clear: ClearRequest = parse_body(&Bytes::from_static(b"")).unwrap();
        assert!(!clear.all);
        let clear: ClearRequest = parse_body(&Bytes::from_static(b" null ")).unwrap();
        assert!(!clear.all);
    }

    #[test]
    fn fields_are_optional() {
        let add: AddItemRequest = parse_body(&Bytes::from_static(b"{}")).unwrap();
        assert!(add.item.is_none());
        let add: AddItemRequest =
            parse_body(&Bytes::from_static(br#"{"item":"Milk","added_by":"Alice"}"#)).unwrap();
        assert_eq!(add.item.as_deref(), Some("Milk"));
        assert_eq!(add.added_by.as_deref(), Some("Alice"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let res = parse_body::<RemoveItemRequest>(&Bytes::from_static(b"{item:"));
        assert_eq!(res.unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
