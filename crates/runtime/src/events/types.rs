use serde::{Deserialize, Serialize};

use pinpointer_core::{EntityId, Position};

use crate::system::DeviceId;

/// Events on the [`Control`](super::Topic::Control) topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlEvent {
    DeviceAttached { device: DeviceId, carrier: EntityId },
    DeviceDetached { device: DeviceId },
    EntitySpawned { entity: EntityId, position: Position },
    EntityMoved { entity: EntityId, position: Position },
    EntityDespawned { entity: EntityId },
    /// Every device has been updated for `tick`.
    TickCompleted { tick: u64 },
}
