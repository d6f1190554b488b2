//! Table search and category filtering.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::item::InventoryItem;

/// Category dropdown selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// `"All"` (any case) or an empty value selects everything.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(Category::from_label(value))
        }
    }

    pub fn allows(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        CategoryFilter::parse(&value)
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => "All".to_string(),
            CategoryFilter::Only(c) => c.label().to_string(),
        }
    }
}

/// Search box text + category dropdown.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemQuery {
    needle: String,
    category: CategoryFilter,
}

impl ItemQuery {
    pub fn new(text: &str, category: CategoryFilter) -> Self {
        Self {
            needle: text.to_lowercase(),
            category,
        }
    }

    /// Case-insensitive substring match on name OR SKU, AND the category filter.
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if !self.category.allows(item.category()) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        item.name().to_lowercase().contains(&self.needle)
            || item.sku().to_lowercase().contains(&self.needle)
    }

    /// Matching items, in source order.
    pub fn apply<'a>(&self, items: &'a [InventoryItem]) -> Vec<&'a InventoryItem> {
        items.iter().filter(|i| self.matches(i)).collect()
    }
}

/// Owned variant of [`ItemQuery::apply`].
pub fn filter_items(items: &[InventoryItem], text: &str, category: CategoryFilter) -> Vec<InventoryItem> {
    let query = ItemQuery::new(text, category);
    items.iter().filter(|i| query.matches(i)).cloned().collect()
}
