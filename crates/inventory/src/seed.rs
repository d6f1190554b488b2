use chrono::{DateTime, Duration, Utc};

use nexus_core::ItemId;

use crate::category::Category;
use crate::item::{InventoryItem, ItemDraft};

struct SeedRow {
    name: &'static str,
    sku: &'static str,
    category: Category,
    quantity: u64,
    unit_price: f64,
    threshold: u64,
    description: &'static str,
    age_secs: i64,
}

const SEED: [SeedRow; 5] = [
    SeedRow {
        name: "Ergonomic Mesh Chair",
        sku: "FUR-001",
        category: Category::Furniture,
        quantity: 12,
        unit_price: 249.99,
        threshold: 5,
        description: "High-back mesh office chair with lumbar support.",
        age_secs: 0,
    },
    SeedRow {
        name: "Wireless Mechanical Keyboard",
        sku: "PER-042",
        category: Category::Peripherals,
        quantity: 4,
        unit_price: 129.50,
        threshold: 10,
        description: "RGB backlit mechanical keyboard with blue switches.",
        age_secs: 86_400,
    },
    SeedRow {
        name: "27\" 4K Monitor",
        sku: "ELE-105",
        category: Category::Electronics,
        quantity: 8,
        unit_price: 450.00,
        threshold: 3,
        description: "IPS panel 4K monitor suitable for design work.",
        age_secs: 172_800,
    },
    SeedRow {
        name: "USB-C Docking Station",
        sku: "ACC-221",
        category: Category::Accessories,
        quantity: 25,
        unit_price: 89.99,
        threshold: 8,
        description: "12-in-1 USB-C hub with HDMI and Ethernet.",
        age_secs: 0,
    },
    SeedRow {
        name: "Standing Desk Motorized",
        sku: "FUR-009",
        category: Category::Furniture,
        quantity: 2,
        unit_price: 599.00,
        threshold: 4,
        description: "Dual-motor electric standing desk frame.",
        age_secs: 400_000,
    },
];

/// Default stock list for a first run, with fresh ids.
pub fn seed_inventory(now: DateTime<Utc>) -> Vec<InventoryItem> {
    SEED.iter()
        .filter_map(|row| {
            let draft = ItemDraft {
                name: row.name.to_string(),
                sku: row.sku.to_string(),
                category: row.category,
                quantity: row.quantity,
                unit_price: row.unit_price,
                threshold: row.threshold,
                description: row.description.to_string(),
            };
            InventoryItem::from_draft(ItemId::new(), &draft, now - Duration::seconds(row.age_secs)).ok()
        })
        .collect()
}
