//! Mutation pipeline (application-level orchestration).
//!
//! ```text
//! Command
//!   ↓
//! 1. Handle + apply on the in-memory store (pure decision, then evolve)
//!   ↓
//! 2. Publish events to the store's bus (subscribers: refresher, realtime stream)
//!   ↓
//! 3. Persist the whole collection under the fixed key
//! ```
//!
//! Persistence is not transactional with the mutation: a failed write is
//! logged and the in-memory change stays applied.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error};

use nexus_core::{Aggregate, DomainError, ItemId};
use nexus_events::{Event, Subscription};
use nexus_inventory::{
    CreateItem, DeleteItem, InventoryCommand, InventoryEvent, InventoryItem, InventoryStore,
    ItemDraft, UpdateItem,
};

use crate::persistence::KeyValueStore;
use crate::repository::{LoadSource, load_inventory, save_inventory};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Input rejected before reaching the store.
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("invalid identifier: {0}")]
    InvalidId(String),
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => DispatchError::Validation(msg),
            DomainError::InvariantViolation(msg) => DispatchError::InvariantViolation(msg),
            DomainError::InvalidId(msg) => DispatchError::InvalidId(msg),
            DomainError::NotFound => DispatchError::NotFound,
            DomainError::Conflict(msg) => DispatchError::Conflict(msg),
        }
    }
}

/// Owns the item store and its backing storage.
pub struct InventoryService {
    store: InventoryStore,
    storage: Arc<dyn KeyValueStore>,
    source: LoadSource,
}

impl core::fmt::Debug for InventoryService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryService")
            .field("items", &self.store.items().len())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl InventoryService {
    /// Load persisted state (or the seed) from `storage`.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let (inventory, source) = load_inventory(storage.as_ref(), Utc::now());
        let service = Self {
            store: InventoryStore::new(inventory),
            storage,
            source,
        };
        if source == LoadSource::Seed {
            // First run: make the seed durable right away.
            service.persist();
        }
        service
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn items(&self) -> &[InventoryItem] {
        self.store.items()
    }

    pub fn snapshot(&self) -> Vec<InventoryItem> {
        self.store.snapshot()
    }

    pub fn get(&self, item_id: ItemId) -> Option<&InventoryItem> {
        self.store.get(item_id)
    }

    /// Change notifications for every applied event.
    pub fn subscribe(&self) -> Subscription<InventoryEvent> {
        self.store.subscribe()
    }

    /// Apply a command, then persist. Nothing is written when the command is rejected.
    pub fn dispatch(&mut self, command: &InventoryCommand) -> Result<Vec<InventoryEvent>, DispatchError> {
        let events = self.store.apply(command)?;
        self.after_mutation(&events);
        Ok(events)
    }

    pub fn create(&mut self, draft: ItemDraft) -> Result<InventoryItem, DispatchError> {
        let item_id = ItemId::new();
        let events = self.store.apply(&InventoryCommand::CreateItem(CreateItem {
            item_id,
            draft,
            occurred_at: Utc::now(),
        }))?;
        self.after_mutation(&events);
        self.store.get(item_id).cloned().ok_or(DispatchError::NotFound)
    }

    pub fn update(&mut self, item_id: ItemId, draft: ItemDraft) -> Result<InventoryItem, DispatchError> {
        let events = self.store.apply(&InventoryCommand::UpdateItem(UpdateItem {
            item_id,
            draft,
            occurred_at: Utc::now(),
        }))?;
        self.after_mutation(&events);
        self.store.get(item_id).cloned().ok_or(DispatchError::NotFound)
    }

    pub fn delete(&mut self, item_id: ItemId) -> Result<(), DispatchError> {
        let events = self.store.apply(&InventoryCommand::DeleteItem(DeleteItem {
            item_id,
            occurred_at: Utc::now(),
        }))?;
        self.after_mutation(&events);
        Ok(())
    }

    fn after_mutation(&self, events: &[InventoryEvent]) {
        for event in events {
            debug!(
                event = event.event_type(),
                item = %event.item_id(),
                version = self.store.inventory().version(),
                "inventory event applied"
            );
        }
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = save_inventory(self.storage.as_ref(), self.store.items()) {
            error!(error = %e, items = self.store.items().len(), "failed to persist inventory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{InMemoryKeyValueStore, StorageError};
    use crate::repository::INVENTORY_KEY;
    use nexus_inventory::Category;

    fn draft(name: &str, sku: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            sku: sku.to_string(),
            category: Category::Networking,
            quantity: 3,
            unit_price: 19.99,
            threshold: 5,
            description: String::new(),
        }
    }

    fn stored_len(storage: &InMemoryKeyValueStore) -> usize {
        let raw = storage.get(INVENTORY_KEY).unwrap().unwrap();
        serde_json::from_str::<Vec<InventoryItem>>(&raw).unwrap().len()
    }

    #[test]
    fn first_load_persists_seed() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let service = InventoryService::load(storage.clone());

        assert_eq!(service.source(), LoadSource::Seed);
        assert_eq!(stored_len(&storage), 5);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut service = InventoryService::load(storage.clone());

        let item = service.create(draft("Gigabit Switch", "NET-010")).unwrap();
        assert_eq!(stored_len(&storage), 6);

        let mut changed = draft("Gigabit Switch 8-port", "NET-010");
        changed.quantity = 12;
        let updated = service.update(item.id_typed(), changed).unwrap();
        assert_eq!(updated.quantity(), 12);

        service.delete(item.id_typed()).unwrap();
        assert_eq!(stored_len(&storage), 5);

        let reloaded = InventoryService::load(storage.clone());
        assert_eq!(reloaded.source(), LoadSource::Stored);
        assert!(reloaded.get(item.id_typed()).is_none());
    }

    #[test]
    fn rejected_save_writes_nothing() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut service = InventoryService::load(storage.clone());
        let before = storage.get(INVENTORY_KEY).unwrap();

        let err = service.create(draft("", "NET-010")).unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
        assert_eq!(storage.get(INVENTORY_KEY).unwrap(), before);
        assert_eq!(service.items().len(), 5);
    }

    #[test]
    fn unknown_id_maps_to_not_found() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut service = InventoryService::load(storage);

        let missing = ItemId::new();
        assert_eq!(service.delete(missing).unwrap_err(), DispatchError::NotFound);
        assert_eq!(
            service.update(missing, draft("A", "B")).unwrap_err(),
            DispatchError::NotFound
        );
        assert_eq!(
            service
                .dispatch(&InventoryCommand::DeleteItem(DeleteItem {
                    item_id: missing,
                    occurred_at: Utc::now(),
                }))
                .unwrap_err(),
            DispatchError::NotFound
        );
    }

    #[test]
    fn subscribers_see_mutations() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut service = InventoryService::load(storage);
        let sub = service.subscribe();

        let item = service.create(draft("Gigabit Switch", "NET-010")).unwrap();
        service.delete(item.id_typed()).unwrap();

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.item_id() == item.id_typed()));
    }

    /// Storage that refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    #[test]
    fn failed_write_keeps_mutation_applied() {
        let mut service = InventoryService::load(Arc::new(ReadOnlyStore));
        let item = service.create(draft("Gigabit Switch", "NET-010")).unwrap();
        assert!(service.get(item.id_typed()).is_some());
        assert_eq!(service.items().len(), 6);
    }
}
