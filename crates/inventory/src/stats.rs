//! Dashboard aggregation.
//!
//! Every function here is pure: same collection in, same statistics out.
//! Category breakdowns list each category once, in order of its first
//! appearance in the input; categories with no items are left out. Per-category
//! quantities saturate at `u64::MAX`.

use serde::Serialize;

use crate::category::Category;
use crate::item::InventoryItem;

/// Per-category totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: Category,
    pub quantity: u64,
    pub value: f64,
}

/// Derived statistics for the whole collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_value: f64,
    pub low_stock_count: usize,
    pub item_count: usize,
    pub categories: Vec<CategoryBreakdown>,
}

impl InventoryStats {
    /// Single pass over the collection.
    pub fn compute(items: &[InventoryItem]) -> Self {
        let mut stats = InventoryStats {
            item_count: items.len(),
            ..Default::default()
        };

        for item in items {
            let value = item.stock_value();
            stats.total_value += value;
            if item.is_low_stock() {
                stats.low_stock_count += 1;
            }

            match stats.categories.iter_mut().find(|b| b.category == item.category()) {
                Some(b) => {
                    b.quantity = b.quantity.saturating_add(item.quantity());
                    b.value += value;
                }
                None => stats.categories.push(CategoryBreakdown {
                    category: item.category(),
                    quantity: item.quantity(),
                    value,
                }),
            }
        }

        stats
    }

    /// Number of distinct categories present.
    pub fn active_categories(&self) -> usize {
        self.categories.len()
    }

    pub fn category_quantity(&self) -> Vec<(Category, u64)> {
        self.categories.iter().map(|b| (b.category, b.quantity)).collect()
    }

    pub fn category_value(&self) -> Vec<(Category, f64)> {
        self.categories.iter().map(|b| (b.category, b.value)).collect()
    }
}

/// Sum of `quantity * unit_price` over all items.
pub fn total_value(items: &[InventoryItem]) -> f64 {
    items.iter().map(InventoryItem::stock_value).sum()
}

/// Items at or below their threshold.
pub fn low_stock_count(items: &[InventoryItem]) -> usize {
    items.iter().filter(|i| i.is_low_stock()).count()
}

pub fn category_quantities(items: &[InventoryItem]) -> Vec<(Category, u64)> {
    InventoryStats::compute(items).category_quantity()
}

pub fn category_values(items: &[InventoryItem]) -> Vec<(Category, f64)> {
    InventoryStats::compute(items).category_value()
}
