//! Infrastructure layer: persistence, the mutation pipeline and AI orchestration.

pub mod ai;
pub mod persistence;
pub mod repository;
pub mod service;

pub use persistence::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError};
pub use repository::{INVENTORY_KEY, LoadSource, load_inventory, save_inventory};
pub use service::{DispatchError, InventoryService};
