//! Entity trait: identity + continuity across state changes.

use std::collections::HashSet;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// First id that occurs more than once, if any.
pub fn find_duplicate_id<E: Entity>(entities: &[E]) -> Option<&E::Id> {
    let mut seen = HashSet::with_capacity(entities.len());
    entities.iter().map(|e| e.id()).find(|id| !seen.insert(*id))
}
