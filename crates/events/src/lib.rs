//! `nexus-events` — change notification primitives.
//!
//! Inventory mutations are described as events. The store publishes them on an
//! [`EventBus`] so that other parts of the process (persistence, the insights
//! refresher, realtime streams) can react without the store knowing about them.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
