use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use nexus_inventory::{ItemDraft, filter_items};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ItemListQuery>,
) -> axum::response::Response {
    let items = services.snapshot();
    let matches = filter_items(&items, query.text(), query.category_filter());
    (StatusCode::OK, Json(matches)).into_response()
}

/// Blank add-item form with a generated SKU placeholder.
pub async fn new_draft() -> Json<ItemDraft> {
    Json(ItemDraft::new_form())
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<ItemDraft>, JsonRejection>,
) -> axum::response::Response {
    let draft = match errors::json_body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.mutate(|inventory| inventory.create(draft)) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.get_item(item_id) {
        Some(item) => (StatusCode::OK, Json(item)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<ItemDraft>, JsonRejection>,
) -> axum::response::Response {
    let item_id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let draft = match errors::json_body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.mutate(|inventory| inventory.update(item_id, draft)) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.mutate(|inventory| inventory.delete(item_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
