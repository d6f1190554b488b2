//! Inventory domain module.
//!
//! This crate contains the business rules for the stock list, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage):
//! - `item` / `category`: the record model, drafts and save-time validation
//! - `store`: the single-writer item collection (commands in, events out)
//! - `stats`: dashboard aggregation
//! - `filter`: table search and category filtering
//! - `seed`: the default list used when nothing has been saved yet

pub mod category;
pub mod filter;
pub mod item;
pub mod seed;
pub mod stats;
pub mod store;

pub use category::Category;
pub use filter::{CategoryFilter, ItemQuery, filter_items};
pub use item::{DEFAULT_THRESHOLD, InventoryItem, ItemDraft};
pub use seed::seed_inventory;
pub use stats::{
    CategoryBreakdown, InventoryStats, category_quantities, category_values, low_stock_count,
    total_value,
};
pub use store::{
    CreateItem, DeleteItem, Inventory, InventoryCommand, InventoryEvent, InventoryStore,
    ItemCreated, ItemDeleted, ItemUpdated, UpdateItem,
};
