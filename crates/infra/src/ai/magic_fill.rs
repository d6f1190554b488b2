//! Merge AI suggestions into a pending item draft.

use tracing::debug;

use nexus_ai::{AiItemSuggestion, InventoryAssistant, InventoryItemSnapshot};
use nexus_inventory::{Category, InventoryItem, ItemDraft};

/// Names shorter than this are not sent for suggestions.
pub const MAGIC_FILL_MIN_NAME_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MagicFillOutcome {
    /// `false` when the name was too short or no suggestion was available.
    pub applied: bool,
    pub draft: ItemDraft,
}

/// Labels of the known categories, in display order.
pub fn category_labels() -> Vec<String> {
    Category::known().iter().map(|c| c.label().to_string()).collect()
}

/// Overwrite category, price, description and threshold from a suggestion.
///
/// Name, SKU and quantity are kept. A category outside the known set falls
/// back to the default category.
pub fn apply_suggestion(draft: &ItemDraft, suggestion: &AiItemSuggestion) -> ItemDraft {
    let category = Category::parse_known(&suggestion.category).unwrap_or_else(Category::first_known);

    ItemDraft {
        category,
        unit_price: suggestion.estimated_price,
        description: suggestion.description.clone(),
        threshold: suggestion.suggested_threshold.round().max(0.0) as u64,
        ..draft.clone()
    }
}

/// Ask the assistant about `draft.name` and merge the answer.
pub async fn magic_fill(assistant: &InventoryAssistant, draft: ItemDraft) -> MagicFillOutcome {
    if draft.name.chars().count() < MAGIC_FILL_MIN_NAME_LEN {
        debug!(name = %draft.name, "name too short for magic fill");
        return MagicFillOutcome { applied: false, draft };
    }

    match assistant.suggest_item_details(&draft.name).await {
        Some(suggestion) => MagicFillOutcome {
            applied: true,
            draft: apply_suggestion(&draft, &suggestion),
        },
        None => MagicFillOutcome { applied: false, draft },
    }
}

/// Minimized per-item summaries for the insights request.
pub fn snapshot_items(items: &[InventoryItem]) -> Vec<InventoryItemSnapshot> {
    items
        .iter()
        .map(|i| InventoryItemSnapshot {
            name: i.name().to_string(),
            quantity: i.quantity(),
            unit_price: i.unit_price(),
            category: i.category().label().to_string(),
        })
        .collect()
}
