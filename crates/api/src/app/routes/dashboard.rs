use std::sync::Arc;

use axum::{Json, extract::Extension};

use nexus_inventory::InventoryStats;

use crate::app::services::AppServices;

pub async fn get_dashboard(Extension(services): Extension<Arc<AppServices>>) -> Json<InventoryStats> {
    Json(InventoryStats::compute(&services.snapshot()))
}
