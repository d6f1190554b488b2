use serde::{Deserialize, Serialize};

/// Product category.
///
/// The six named categories form the fixed set offered to users. `Uncategorized`
/// is the sentinel used when a record has no category, or one outside the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Electronics,
    OfficeSupplies,
    Furniture,
    Peripherals,
    Networking,
    Accessories,
    #[default]
    Uncategorized,
}

const KNOWN: [Category; 6] = [
    Category::Electronics,
    Category::OfficeSupplies,
    Category::Furniture,
    Category::Peripherals,
    Category::Networking,
    Category::Accessories,
];

impl Category {
    /// The fixed category set, in display order.
    pub fn known() -> &'static [Category] {
        &KNOWN
    }

    /// First entry of the fixed set; new drafts start here.
    pub fn first_known() -> Category {
        KNOWN[0]
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::OfficeSupplies => "Office Supplies",
            Category::Furniture => "Furniture",
            Category::Peripherals => "Peripherals",
            Category::Networking => "Networking",
            Category::Accessories => "Accessories",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Exact match against the fixed set. The sentinel is not part of it.
    pub fn parse_known(label: &str) -> Option<Category> {
        KNOWN.iter().copied().find(|c| c.label() == label)
    }

    /// Lenient parse: anything outside the fixed set maps to `Uncategorized`.
    pub fn from_label(label: &str) -> Category {
        Self::parse_known(label).unwrap_or(Category::Uncategorized)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_label(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}
