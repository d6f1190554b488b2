use axum::{Router, routing::get};

pub mod ai;
pub mod dashboard;
pub mod items;
pub mod system;

/// Router for every endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/categories", get(system::categories))
        .route("/stream", get(system::stream))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/drafts/new", get(items::new_draft))
        .nest("/items", items::router())
        .nest("/ai", ai::router())
}
