use serde::{Deserialize, Serialize};

use nexus_ai::AiItemSuggestion;
use nexus_inventory::{CategoryFilter, ItemDraft};

// -------------------------
// Request DTOs
// -------------------------

/// `GET /items?q=&category=`
#[derive(Debug, Default, Deserialize)]
pub struct ItemListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ItemListQuery {
    pub fn text(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::parse(self.category.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub name: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub available: bool,
    pub suggestion: Option<AiItemSuggestion>,
}

#[derive(Debug, Serialize)]
pub struct MagicFillResponse {
    pub applied: bool,
    pub draft: ItemDraft,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// `None` when the collection is empty and nothing was scheduled.
    pub generation: Option<u64>,
}
