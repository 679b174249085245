//! Minimal in-memory world shared by the tracking unit tests.

use std::collections::BTreeMap;

use crate::env::{CandidateHit, WorldOracle};
use crate::state::{CapabilitySet, EntityId, Position};

#[derive(Clone, Debug)]
pub(crate) struct FakeEntity {
    pub position: Position,
    pub capabilities: CapabilitySet,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeWorld {
    entities: BTreeMap<EntityId, FakeEntity>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, position: Position, capabilities: CapabilitySet) -> EntityId {
        let entity = EntityId(id);
        self.entities.insert(
            entity,
            FakeEntity {
                position,
                capabilities,
                name: Some(format!("entity {id}")),
            },
        );
        entity
    }

    pub fn move_to(&mut self, entity: EntityId, position: Position) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.position = position;
        }
    }

    pub fn rename(&mut self, entity: EntityId, name: Option<&str>) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.name = name.map(str::to_owned);
        }
    }

    pub fn remove(&mut self, entity: EntityId) {
        self.entities.remove(&entity);
    }
}

impl WorldOracle for FakeWorld {
    fn resolve_position(&self, entity: EntityId) -> Option<Position> {
        self.entities.get(&entity).map(|e| e.position)
    }

    fn query_by_capability(
        &self,
        capabilities: CapabilitySet,
        origin: Position,
        range: Option<f32>,
    ) -> Vec<CandidateHit> {
        // Reverse order so callers cannot rely on the oracle sorting for them.
        self.entities
            .iter()
            .rev()
            .filter(|(_, e)| capabilities.matches(e.capabilities))
            .filter(|(_, e)| range.is_none_or(|r| origin.distance_to(e.position) <= r))
            .map(|(&id, e)| CandidateHit::new(id, e.position))
            .collect()
    }

    fn display_name(&self, entity: EntityId) -> Option<String> {
        self.entities.get(&entity).and_then(|e| e.name.clone())
    }
}
