//! Traits describing the world a pinpointer reads from.
//!
//! The core never owns entities. Positions, capability lookups and display
//! names come from a [`WorldOracle`] supplied by the caller on every call, so
//! handles are re-validated each time they are used.
use crate::state::{CapabilitySet, EntityId, Position};

/// Read-only spatial query provider.
///
/// Implementations are synchronous lookups against in-memory world state.
pub trait WorldOracle: Send + Sync {
    /// Returns the current position of `entity`, or `None` if it no longer exists.
    fn resolve_position(&self, entity: EntityId) -> Option<Position>;

    /// Lists every entity declaring at least one of `capabilities`.
    ///
    /// When `range` is set, only entities within that many tiles of `origin`
    /// are returned. Order is unspecified; callers sort.
    fn query_by_capability(
        &self,
        capabilities: CapabilitySet,
        origin: Position,
        range: Option<f32>,
    ) -> Vec<CandidateHit>;

    /// Human-readable label for `entity`, if it has one.
    fn display_name(&self, entity: EntityId) -> Option<String>;

    fn contains(&self, entity: EntityId) -> bool {
        self.resolve_position(entity).is_some()
    }
}

/// One raw result of [`WorldOracle::query_by_capability`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateHit {
    pub entity: EntityId,
    pub position: Position,
}

impl CandidateHit {
    pub const fn new(entity: EntityId, position: Position) -> Self {
        Self { entity, position }
    }
}
