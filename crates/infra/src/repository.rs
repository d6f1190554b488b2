//! Inventory load/save on top of a [`KeyValueStore`].

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use nexus_inventory::{Inventory, InventoryItem, seed_inventory};

use crate::persistence::{KeyValueStore, StorageError};

/// Fixed storage key for the item collection.
pub const INVENTORY_KEY: &str = "nexus_inventory";

/// Where the startup collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    Seed,
}

/// Read the persisted collection, falling back to the seed list when nothing
/// usable is stored (absent, unreadable, unparsable or with duplicate ids).
pub fn load_inventory<S>(store: &S, now: DateTime<Utc>) -> (Inventory, LoadSource)
where
    S: KeyValueStore + ?Sized,
{
    match try_load(store) {
        Ok(Some(inventory)) => {
            info!(items = inventory.len(), "inventory loaded from storage");
            return (inventory, LoadSource::Stored);
        }
        Ok(None) => info!("no stored inventory; using seed data"),
        Err(reason) => warn!(error = %reason, "stored inventory unusable; using seed data"),
    }

    // Seed ids are freshly generated and always unique.
    let seed = Inventory::from_items(seed_inventory(now)).unwrap_or_else(|_| Inventory::empty());
    (seed, LoadSource::Seed)
}

fn try_load<S>(store: &S) -> Result<Option<Inventory>, String>
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(INVENTORY_KEY).map_err(|e| e.to_string())? else {
        return Ok(None);
    };
    let items: Vec<InventoryItem> = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Inventory::from_items(items)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Overwrite the stored collection in full.
pub fn save_inventory<S>(store: &S, items: &[InventoryItem]) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(items)?;
    store.set(INVENTORY_KEY, &json)
}
