use arrayvec::ArrayVec;

use super::EntityId;
use crate::config::PinpointerConfig;

/// Inline buffer backing a [`TargetStore`].
pub type TargetBuffer = ArrayVec<EntityId, { PinpointerConfig::MAX_STORED_TARGETS }>;

/// Insertion-ordered set of remembered entity handles with a soft capacity.
///
/// # Invariants
///
/// - `len() <= capacity() <= PinpointerConfig::MAX_STORED_TARGETS`
/// - every handle appears at most once
///
/// The store only tracks membership. Coupling with a device's current target
/// lives on [`PinpointerDevice`](super::PinpointerDevice).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetStore {
    entries: TargetBuffer,
    capacity: usize,
}

impl TargetStore {
    /// Creates an empty store. `capacity` is clamped to the inline ceiling.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: ArrayVec::new(),
            capacity: capacity.min(PinpointerConfig::MAX_STORED_TARGETS),
        }
    }

    /// Appends `entity` unless it is already stored or the store is full.
    ///
    /// Returns true if the entity was added.
    pub fn add(&mut self, entity: EntityId) -> bool {
        if self.contains(entity) || self.is_full() {
            return false;
        }
        self.entries.push(entity);
        true
    }

    /// Removes and returns the oldest entry.
    pub fn evict_oldest(&mut self) -> Option<EntityId> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Removes `entity` if present, keeping the order of the rest.
    pub fn remove(&mut self, entity: EntityId) -> bool {
        match self.entries.iter().position(|&e| e == entity) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entries.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().copied()
    }

    pub fn as_slice(&self) -> &[EntityId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Changes the capacity, evicting the oldest entries that no longer fit.
    ///
    /// Returns the evicted handles, oldest first.
    pub(crate) fn resize(&mut self, capacity: usize) -> Vec<EntityId> {
        self.capacity = capacity.min(PinpointerConfig::MAX_STORED_TARGETS);
        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(entity) = self.evict_oldest() {
                evicted.push(entity);
            }
        }
        evicted
    }

    /// Replaces the contents with `entries`, dropping duplicates and overflow.
    pub(crate) fn replace<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = EntityId>,
    {
        self.entries.clear();
        for entity in entries {
            self.add(entity);
        }
    }
}

impl Default for TargetStore {
    fn default() -> Self {
        Self::with_capacity(PinpointerConfig::DEFAULT_MAX_TARGETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_ignores_duplicates_and_overflow() {
        let mut store = TargetStore::with_capacity(2);
        assert!(store.add(EntityId(1)));
        assert!(!store.add(EntityId(1)));
        assert!(store.add(EntityId(2)));
        assert!(!store.add(EntityId(3)));
        assert_eq!(store.as_slice(), &[EntityId(1), EntityId(2)]);
    }

    #[test]
    fn evict_oldest_makes_room() {
        let mut store = TargetStore::with_capacity(2);
        store.add(EntityId(1));
        store.add(EntityId(2));

        assert_eq!(store.evict_oldest(), Some(EntityId(1)));
        assert!(store.add(EntityId(3)));
        assert_eq!(store.as_slice(), &[EntityId(2), EntityId(3)]);

        store.clear();
        assert_eq!(store.evict_oldest(), None);
    }

    #[test]
    fn remove_keeps_order() {
        let mut store = TargetStore::with_capacity(4);
        for id in 1..=4 {
            store.add(EntityId(id));
        }
        assert!(store.remove(EntityId(2)));
        assert!(!store.remove(EntityId(2)));
        assert_eq!(store.as_slice(), &[EntityId(1), EntityId(3), EntityId(4)]);
    }

    #[test]
    fn never_exceeds_capacity_or_duplicates() {
        let mut store = TargetStore::with_capacity(5);
        // Deterministic pseudo-random mix of adds, removes and evictions.
        let mut seed = 17u32;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let id = EntityId((seed >> 16) % 9);
            match (seed >> 8) % 5 {
                0 => {
                    store.remove(id);
                }
                1 => {
                    store.evict_oldest();
                }
                _ => {
                    store.add(id);
                }
            }

            assert!(store.len() <= store.capacity());
            let mut seen: Vec<_> = store.iter().collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), store.len());
        }
    }

    #[test]
    fn resize_evicts_oldest_first() {
        let mut store = TargetStore::with_capacity(4);
        for id in 1..=4 {
            store.add(EntityId(id));
        }
        assert_eq!(store.resize(2), vec![EntityId(1), EntityId(2)]);
        assert_eq!(store.as_slice(), &[EntityId(3), EntityId(4)]);
        assert_eq!(store.capacity(), 2);
    }

    #[test]
    fn capacity_is_clamped_to_inline_ceiling() {
        let store = TargetStore::with_capacity(1_000);
        assert_eq!(store.capacity(), PinpointerConfig::MAX_STORED_TARGETS);
    }
}
