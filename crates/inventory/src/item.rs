use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use nexus_core::{DomainError, DomainResult, Entity, ItemId};

use crate::category::Category;

/// Low-stock threshold used for new drafts.
pub const DEFAULT_THRESHOLD: u64 = 5;

/// A stock record.
///
/// The serialized form (camelCase fields, RFC 3339 `lastUpdated`) is also the
/// persisted layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    sku: String,
    #[serde(default)]
    category: Category,
    quantity: u64,
    unit_price: f64,
    threshold: u64,
    #[serde(default)]
    description: String,
    last_updated: DateTime<Utc>,
}

impl InventoryItem {
    /// Build a record from a validated draft.
    pub fn from_draft(id: ItemId, draft: &ItemDraft, last_updated: DateTime<Utc>) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name.clone(),
            sku: draft.sku.clone(),
            category: draft.category,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            threshold: draft.threshold,
            description: draft.description.clone(),
            last_updated,
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// `quantity <= threshold`; equality counts as low stock.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }

    /// Value of the units on hand (`quantity * unit_price`).
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Pending, unsaved item state (the add/edit form).
///
/// Magic fill merges AI suggestions into a draft; nothing reaches the store
/// until the draft is saved and passes [`ItemDraft::validate`]. A submitted
/// draft without a category is saved as [`Category::Uncategorized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    pub name: String,
    pub sku: String,
    #[serde(default = "uncategorized")]
    pub category: Category,
    pub quantity: u64,
    pub unit_price: f64,
    pub threshold: u64,
    pub description: String,
}

fn uncategorized() -> Category {
    Category::Uncategorized
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            sku: String::new(),
            category: Category::first_known(),
            quantity: 0,
            unit_price: 0.0,
            threshold: DEFAULT_THRESHOLD,
            description: String::new(),
        }
    }
}

impl ItemDraft {
    /// Blank add-item form: first known category and a `SKU-<n>` placeholder.
    pub fn new_form() -> Self {
        let n: u32 = rand::thread_rng().gen_range(0..10_000);
        Self {
            sku: format!("SKU-{n}"),
            ..Self::default()
        }
    }

    /// Draft pre-filled from an existing record, for editing.
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            sku: item.sku.clone(),
            category: item.category,
            quantity: item.quantity,
            unit_price: item.unit_price,
            threshold: item.threshold,
            description: item.description.clone(),
        }
    }

    /// Save-time checks. A rejected draft never reaches the store.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(DomainError::validation(
                "unit price must be a finite, non-negative amount",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ItemDraft {
        ItemDraft {
            name: "Ergonomic Mesh Chair".to_string(),
            sku: "FUR-001".to_string(),
            category: Category::Furniture,
            quantity: 12,
            unit_price: 249.99,
            threshold: 5,
            description: "High-back mesh office chair.".to_string(),
        }
    }

    #[test]
    fn default_draft_matches_new_item_form() {
        let d = ItemDraft::default();
        assert_eq!(d.category, Category::Electronics);
        assert_eq!(d.quantity, 0);
        assert_eq!(d.threshold, DEFAULT_THRESHOLD);
        assert!(d.name.is_empty());
    }

    #[test]
    fn new_form_prefills_sku_placeholder() {
        let d = ItemDraft::new_form();
        let n: u32 = d.sku.strip_prefix("SKU-").unwrap().parse().unwrap();
        assert!(n < 10_000);
        assert_eq!(d.category, Category::first_known());
        assert!(d.name.is_empty());
    }

    #[test]
    fn submitted_draft_without_category_is_uncategorized() {
        let d: ItemDraft = serde_json::from_str(r#"{"name":"Widget","sku":"W-1"}"#).unwrap();
        assert_eq!(d.category, Category::Uncategorized);
        assert_eq!(d.threshold, DEFAULT_THRESHOLD);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn blank_name_or_sku_is_rejected() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));

        let mut d = draft();
        d.sku = String::new();
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn negative_or_nan_price_is_rejected() {
        let mut d = draft();
        d.unit_price = -1.0;
        assert!(d.validate().is_err());

        d.unit_price = f64::NAN;
        assert!(d.validate().is_err());
    }

    #[test]
    fn low_stock_boundary_is_inclusive() {
        let now = Utc::now();
        let mut d = draft();

        d.quantity = 5;
        d.threshold = 5;
        assert!(InventoryItem::from_draft(ItemId::new(), &d, now).unwrap().is_low_stock());

        d.quantity = 6;
        assert!(!InventoryItem::from_draft(ItemId::new(), &d, now).unwrap().is_low_stock());
    }

    #[test]
    fn stock_value_is_quantity_times_price() {
        let item = InventoryItem::from_draft(ItemId::new(), &draft(), Utc::now()).unwrap();
        assert!((item.stock_value() - 2999.88).abs() < 1e-9);
    }

    #[test]
    fn persisted_layout_uses_camel_case() {
        let item = InventoryItem::from_draft(ItemId::new(), &draft(), Utc::now()).unwrap();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["unitPrice"], 249.99);
        assert_eq!(json["category"], "Furniture");
        assert!(json.get("lastUpdated").is_some());

        let back: InventoryItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn missing_category_deserializes_to_sentinel() {
        let json = serde_json::json!({
            "id": ItemId::new().to_string(),
            "name": "Cable",
            "sku": "C-1",
            "quantity": 3,
            "unitPrice": 2.5,
            "threshold": 1,
            "lastUpdated": "2024-01-01T00:00:00Z",
        });

        let item: InventoryItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.category(), Category::Uncategorized);
        assert_eq!(item.description(), "");
    }

    #[test]
    fn editing_draft_copies_every_field() {
        let item = InventoryItem::from_draft(ItemId::new(), &draft(), Utc::now()).unwrap();
        assert_eq!(ItemDraft::from_item(&item), draft());
    }
}
