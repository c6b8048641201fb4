use axum::{
    Router,
    routing::{get, post},
};

pub mod action;
pub mod inventory;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/api", api_router())
}

fn api_router() -> Router {
    Router::new()
        .route("/inventory", get(inventory::tree))
        .route("/types", get(inventory::types))
        .route("/logs", get(inventory::logs))
        .route("/report", get(inventory::report))
        .route("/history", get(inventory::history))
        .route("/history/export", get(inventory::history_export))
        .route("/action", post(action::perform))
}
