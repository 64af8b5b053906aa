//! HTTP surface of the hub (Axum router + handlers).
//!
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request bodies and lenient JSON parsing
//! - `errors.rs`: consistent JSON error responses
//! - `middleware.rs`: CORS for the dashboard frontend

use axum::{
    routing::{get, post},
    Router,
};

use hub_core::shopping::ShoppingService;

pub mod dto;
pub mod errors;
pub mod middleware;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub shopping: ShoppingService,
}

/// Build the full HTTP router (public entrypoint used by the binary and tests).
pub fn build_app(shopping: ShoppingService) -> Router {
    let state = AppState { shopping };

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/shopping", get(routes::shopping::get_list))
        .route("/shopping/add", post(routes::shopping::add_item))
        .route("/shopping/toggle/:id", post(routes::shopping::toggle_item))
        .route("/shopping/remove", post(routes::shopping::remove_item))
        .route("/shopping/clear", post(routes::shopping::clear))
        .layer(axum::middleware::from_fn(middleware::cors))
        .with_state(state)
}
