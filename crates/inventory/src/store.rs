use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexus_core::{Aggregate, DomainError, DomainResult, ItemId, find_duplicate_id};
use nexus_events::{Event, EventBus, InMemoryEventBus, Subscription};

use crate::item::{InventoryItem, ItemDraft};

/// Command: CreateItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItem {
    pub item_id: ItemId,
    pub draft: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateItem (replace every editable field, keep the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub item_id: ItemId,
    pub draft: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItem {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryCommand {
    CreateItem(CreateItem),
    UpdateItem(UpdateItem),
    DeleteItem(DeleteItem),
}

/// Event: ItemCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCreated {
    pub item: InventoryItem,
}

/// Event: ItemUpdated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdated {
    pub item: InventoryItem,
}

/// Event: ItemDeleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDeleted {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    ItemCreated(ItemCreated),
    ItemUpdated(ItemUpdated),
    ItemDeleted(ItemDeleted),
}

impl InventoryEvent {
    pub fn item_id(&self) -> ItemId {
        match self {
            InventoryEvent::ItemCreated(e) => e.item.id_typed(),
            InventoryEvent::ItemUpdated(e) => e.item.id_typed(),
            InventoryEvent::ItemDeleted(e) => e.item_id,
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemCreated(_) => "inventory.item.created",
            InventoryEvent::ItemUpdated(_) => "inventory.item.updated",
            InventoryEvent::ItemDeleted(_) => "inventory.item.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemCreated(e) => e.item.last_updated(),
            InventoryEvent::ItemUpdated(e) => e.item.last_updated(),
            InventoryEvent::ItemDeleted(e) => e.occurred_at,
        }
    }
}

/// Aggregate: the ordered item collection.
///
/// Invariant: every item has a unique id. Insertion order is preserved;
/// updates keep an item in its slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    version: u64,
}

impl Inventory {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adopt an existing collection (e.g. loaded from storage).
    pub fn from_items(items: Vec<InventoryItem>) -> DomainResult<Self> {
        if let Some(id) = find_duplicate_id(&items) {
            return Err(DomainError::invariant(format!("duplicate item id {id}")));
        }
        Ok(Self { items, version: 0 })
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get(&self, item_id: ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id_typed() == item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, item_id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id_typed() == item_id)
    }

    fn handle_create(&self, cmd: &CreateItem) -> DomainResult<Vec<InventoryEvent>> {
        if self.position(cmd.item_id).is_some() {
            return Err(DomainError::conflict("item already exists"));
        }
        let item = InventoryItem::from_draft(cmd.item_id, &cmd.draft, cmd.occurred_at)?;
        Ok(vec![InventoryEvent::ItemCreated(ItemCreated { item })])
    }

    fn handle_update(&self, cmd: &UpdateItem) -> DomainResult<Vec<InventoryEvent>> {
        if self.position(cmd.item_id).is_none() {
            return Err(DomainError::not_found());
        }
        let item = InventoryItem::from_draft(cmd.item_id, &cmd.draft, cmd.occurred_at)?;
        Ok(vec![InventoryEvent::ItemUpdated(ItemUpdated { item })])
    }

    fn handle_delete(&self, cmd: &DeleteItem) -> DomainResult<Vec<InventoryEvent>> {
        if self.position(cmd.item_id).is_none() {
            return Err(DomainError::not_found());
        }
        Ok(vec![InventoryEvent::ItemDeleted(ItemDeleted {
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemCreated(e) => {
                self.items.push(e.item.clone());
            }
            InventoryEvent::ItemUpdated(e) => {
                if let Some(pos) = self.position(e.item.id_typed()) {
                    self.items[pos] = e.item.clone();
                }
            }
            InventoryEvent::ItemDeleted(e) => {
                self.items.retain(|i| i.id_typed() != e.item_id);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::CreateItem(cmd) => self.handle_create(cmd),
            InventoryCommand::UpdateItem(cmd) => self.handle_update(cmd),
            InventoryCommand::DeleteItem(cmd) => self.handle_delete(cmd),
        }
    }
}

/// Single-writer state container around [`Inventory`].
///
/// `apply` runs a command to completion (decide, then evolve) before it
/// returns, then notifies subscribers. Readers always see the latest
/// synchronously-applied collection.
#[derive(Debug)]
pub struct InventoryStore<B = InMemoryEventBus<InventoryEvent>>
where
    B: EventBus<InventoryEvent>,
{
    inventory: Inventory,
    bus: B,
}

impl InventoryStore {
    pub fn new(inventory: Inventory) -> Self {
        Self::with_bus(inventory, InMemoryEventBus::new())
    }
}

impl<B> InventoryStore<B>
where
    B: EventBus<InventoryEvent>,
{
    pub fn with_bus(inventory: Inventory, bus: B) -> Self {
        Self { inventory, bus }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn items(&self) -> &[InventoryItem] {
        self.inventory.items()
    }

    /// Owned copy of the current collection.
    pub fn snapshot(&self) -> Vec<InventoryItem> {
        self.inventory.items().to_vec()
    }

    pub fn get(&self, item_id: ItemId) -> Option<&InventoryItem> {
        self.inventory.get(item_id)
    }

    pub fn subscribe(&self) -> Subscription<InventoryEvent> {
        self.bus.subscribe()
    }

    /// Decide, apply and publish. On error nothing is applied.
    pub fn apply(&mut self, command: &InventoryCommand) -> DomainResult<Vec<InventoryEvent>> {
        let events = self.inventory.handle(command)?;
        for event in &events {
            self.inventory.apply(event);
        }
        for event in &events {
            // Notification is best-effort; the store stays authoritative.
            let _ = self.bus.publish(event.clone());
        }
        Ok(events)
    }

    /// Create a new item with a fresh id, stamped now.
    pub fn create(&mut self, draft: ItemDraft) -> DomainResult<InventoryItem> {
        let item_id = ItemId::new();
        self.apply(&InventoryCommand::CreateItem(CreateItem {
            item_id,
            draft,
            occurred_at: Utc::now(),
        }))?;
        self.get(item_id).cloned().ok_or_else(DomainError::not_found)
    }

    /// Replace an item's editable fields in place, refreshing `lastUpdated`.
    pub fn update(&mut self, item_id: ItemId, draft: ItemDraft) -> DomainResult<InventoryItem> {
        self.apply(&InventoryCommand::UpdateItem(UpdateItem {
            item_id,
            draft,
            occurred_at: Utc::now(),
        }))?;
        self.get(item_id).cloned().ok_or_else(DomainError::not_found)
    }

    pub fn delete(&mut self, item_id: ItemId) -> DomainResult<()> {
        self.apply(&InventoryCommand::DeleteItem(DeleteItem {
            item_id,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }
}
