//! In-memory world served through [`WorldOracle`].
use std::collections::BTreeMap;

use pinpointer_core::{CandidateHit, CapabilitySet, EntityId, Position, WorldOracle};
use serde::{Deserialize, Serialize};

/// One entity living in a [`MemoryWorld`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldEntity {
    pub position: Position,
    pub capabilities: CapabilitySet,
    pub name: Option<String>,
}

/// Mutable world state owned by the tracking worker.
///
/// Ids are allocated in creation order and never reused, so a despawned
/// handle stays dangling forever.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorld {
    next_id: u32,
    entities: BTreeMap<EntityId, WorldEntity>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        position: Position,
        capabilities: CapabilitySet,
        name: Option<String>,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            WorldEntity {
                position,
                capabilities,
                name,
            },
        );
        id
    }

    /// Removes `entity`, returning what it was.
    pub fn despawn(&mut self, entity: EntityId) -> Option<WorldEntity> {
        self.entities.remove(&entity)
    }

    /// Returns false if `entity` does not exist.
    pub fn move_to(&mut self, entity: EntityId, position: Position) -> bool {
        match self.entities.get_mut(&entity) {
            Some(e) => {
                e.position = position;
                true
            }
            None => false,
        }
    }

    /// Returns false if `entity` does not exist.
    pub fn rename(&mut self, entity: EntityId, name: Option<String>) -> bool {
        match self.entities.get_mut(&entity) {
            Some(e) => {
                e.name = name;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn entity(&self, entity: EntityId) -> Option<&WorldEntity> {
        self.entities.get(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &WorldEntity)> {
        self.entities.iter().map(|(&id, e)| (id, e))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl WorldOracle for MemoryWorld {
    fn resolve_position(&self, entity: EntityId) -> Option<Position> {
        self.entities.get(&entity).map(|e| e.position)
    }

    fn query_by_capability(
        &self,
        capabilities: CapabilitySet,
        origin: Position,
        range: Option<f32>,
    ) -> Vec<CandidateHit> {
        self.entities
            .iter()
            .filter(|(_, e)| capabilities.matches(e.capabilities))
            .filter(|(_, e)| range.is_none_or(|r| origin.distance_to(e.position) <= r))
            .map(|(&id, e)| CandidateHit::new(id, e.position))
            .collect()
    }

    fn display_name(&self, entity: EntityId) -> Option<String> {
        self.entities.get(&entity).and_then(|e| e.name.clone())
    }

    fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }
}
