use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use nexus_infra::ai::{Insight, magic_fill};
use nexus_inventory::ItemDraft;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/suggest", post(suggest))
        .route("/magic-fill", post(magic_fill_draft))
        .route("/insights", get(get_insights))
        .route("/insights/refresh", post(refresh_insights))
}

/// Raw suggestion for a product name; `available: false` when the assistant has nothing.
pub async fn suggest(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::SuggestRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let suggestion = services.assistant().suggest_item_details(&body.name).await;
    Json(dto::SuggestResponse {
        available: suggestion.is_some(),
        suggestion,
    })
    .into_response()
}

/// Merge a suggestion into a pending draft. The draft is never saved here.
pub async fn magic_fill_draft(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<ItemDraft>, JsonRejection>,
) -> axum::response::Response {
    let draft = match errors::json_body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let outcome = magic_fill(services.assistant(), draft).await;
    Json(dto::MagicFillResponse {
        applied: outcome.applied,
        draft: outcome.draft,
    })
    .into_response()
}

pub async fn get_insights(Extension(services): Extension<Arc<AppServices>>) -> Json<Option<Insight>> {
    Json(services.latest_insight())
}

pub async fn refresh_insights(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let generation = services.refresh_insights();
    (StatusCode::ACCEPTED, Json(dto::RefreshResponse { generation })).into_response()
}
