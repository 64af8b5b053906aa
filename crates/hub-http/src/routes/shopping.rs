use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use hub_core::{domain::ItemId, shopping::types::DEFAULT_ADDED_BY};

use crate::{
    dto::{parse_body, AddItemRequest, ClearRequest, RemoveItemRequest},
    errors::{core_error_to_response, json_error},
    AppState,
};

pub async fn get_list(State(state): State<AppState>) -> Response {
    match state.shopping.snapshot().await {
        Ok(list) => Json(list).into_response(),
        Err(e) => core_error_to_response(e),
    }
}

pub async fn add_item(State(state): State<AppState>, body: Bytes) -> Response {
    let req: AddItemRequest = match parse_body(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Some(text) = req.item.filter(|t| !t.trim().is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "No item provided");
    };
    let added_by = req
        .added_by
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADDED_BY.to_string());

    match state.shopping.add_item(&text, &added_by).await {
        Ok(item) => {
            tracing::info!(item_id = item.id.0, added_by = %item.added_by, "item added via http");
            Json(json!({ "success": true, "item": item })).into_response()
        }
        Err(e) => core_error_to_response(e),
    }
}

pub async fn toggle_item(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    // Non-numeric ids cannot name an item.
    let Ok(id) = raw_id.parse::<u64>() else {
        return json_error(StatusCode::NOT_FOUND, "Item not found");
    };
    match state.shopping.toggle_item(ItemId(id)).await {
        Ok(Some(item)) => Json(json!({ "success": true, "item": item })).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => core_error_to_response(e),
    }
}

pub async fn remove_item(State(state): State<AppState>, body: Bytes) -> Response {
    let req: RemoveItemRequest = match parse_body(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Some(text) = req.item.filter(|t| !t.trim().is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "No item provided");
    };

    match state.shopping.remove_item(&text).await {
        Ok(removed) => Json(json!({ "success": removed })).into_response(),
        Err(e) => core_error_to_response(e),
    }
}

pub async fn clear(State(state): State<AppState>, body: Bytes) -> Response {
    let req: ClearRequest = match parse_body(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };

    let res = if req.all {
        state.shopping.clear_all().await
    } else {
        state.shopping.clear_checked().await.map(|_| ())
    };
    match res {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => core_error_to_response(e),
    }
}
