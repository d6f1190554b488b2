use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::sse::{Event as SseEvent, Sse},
};

use nexus_inventory::Category;

use crate::app::services::{self, AppServices};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Known categories, in display order.
pub async fn categories() -> Json<Vec<&'static str>> {
    Json(Category::known().iter().map(|c| c.label()).collect())
}

/// `inventory.changed` after each mutation, `insights.updated` on each published insight.
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>> {
    services::sse_stream(services)
}
