//! Registry of pinpointers attached to carrier entities.
//!
//! [`TrackingSystem`] owns every device and turns the [`DeviceFields`] masks
//! returned by the core into [`TrackingEvent`]s. It is synchronous; the
//! worker in [`crate::workers`] is what serializes access to it.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use pinpointer_core::{
    Angle, CapabilitySet, DeviceFields, DeviceStatus, DistanceBand, EntityId, PinpointerConfig,
    PinpointerDevice, PinpointerSnapshot, RetargetError, TrackerReading, WorldOracle,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{Result, RuntimeError};

/// Handle of an attached device. Allocated in attach order, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// Observable change of one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackingEvent {
    Activated {
        device: DeviceId,
    },
    Deactivated {
        device: DeviceId,
    },
    TargetAcquired {
        device: DeviceId,
        target: EntityId,
        name: Option<String>,
    },
    TargetLost {
        device: DeviceId,
        previous: EntityId,
    },
    /// The tracked entity's display name changed.
    TargetRenamed {
        device: DeviceId,
        name: Option<String>,
    },
    DistanceChanged {
        device: DeviceId,
        band: DistanceBand,
    },
    ArrowMoved {
        device: DeviceId,
        angle: Angle,
    },
    StoredTargetsChanged {
        device: DeviceId,
        stored: Vec<EntityId>,
    },
    RetargetDenied {
        device: DeviceId,
        current: EntityId,
        requested: EntityId,
    },
}

impl TrackingEvent {
    pub fn device(&self) -> DeviceId {
        match self {
            TrackingEvent::Activated { device }
            | TrackingEvent::Deactivated { device }
            | TrackingEvent::TargetAcquired { device, .. }
            | TrackingEvent::TargetLost { device, .. }
            | TrackingEvent::TargetRenamed { device, .. }
            | TrackingEvent::DistanceChanged { device, .. }
            | TrackingEvent::ArrowMoved { device, .. }
            | TrackingEvent::StoredTargetsChanged { device, .. }
            | TrackingEvent::RetargetDenied { device, .. } => *device,
        }
    }

    /// Expands a change mask into events, in a fixed order: power state,
    /// stored targets, target or its name, distance band, arrow.
    pub fn from_changes(
        device: DeviceId,
        changed: DeviceFields,
        before: &PinpointerSnapshot,
        after: &PinpointerSnapshot,
    ) -> Vec<TrackingEvent> {
        let mut events = Vec::new();

        if changed.contains(DeviceFields::IS_ACTIVE) {
            events.push(if after.is_active {
                TrackingEvent::Activated { device }
            } else {
                TrackingEvent::Deactivated { device }
            });
        }
        if changed.contains(DeviceFields::STORED_TARGETS) {
            events.push(TrackingEvent::StoredTargetsChanged {
                device,
                stored: after.stored_targets.to_vec(),
            });
        }
        if changed.contains(DeviceFields::TARGET) {
            match (before.target, after.target) {
                (_, Some(target)) => events.push(TrackingEvent::TargetAcquired {
                    device,
                    target,
                    name: after.target_name.clone(),
                }),
                (Some(previous), None) => {
                    events.push(TrackingEvent::TargetLost { device, previous })
                }
                (None, None) => {}
            }
        } else if changed.contains(DeviceFields::TARGET_NAME) {
            events.push(TrackingEvent::TargetRenamed {
                device,
                name: after.target_name.clone(),
            });
        }
        if changed.contains(DeviceFields::DISTANCE_BAND) {
            events.push(TrackingEvent::DistanceChanged {
                device,
                band: after.distance_band,
            });
        }
        if changed.contains(DeviceFields::ARROW_ANGLE) {
            events.push(TrackingEvent::ArrowMoved {
                device,
                angle: after.arrow_angle,
            });
        }

        events
    }
}

/// Control operation applied to a single device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceControl {
    Activate,
    Deactivate,
    Toggle,
    Retarget(EntityId),
    ClearTarget,
    /// Re-runs nearest-match selection from the carrier's position.
    Scan,
    SetCanRetarget(bool),
    ReconfigureCapabilities(CapabilitySet),
    SetConfig(PinpointerConfig),
}

/// A device and the entity carrying it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedDevice {
    pub carrier: EntityId,
    pub device: PinpointerDevice,
}

/// Read-only view of one attached device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceView {
    pub id: DeviceId,
    pub carrier: EntityId,
    pub status: DeviceStatus,
    pub reading: TrackerReading,
    pub snapshot: PinpointerSnapshot,
}

#[derive(Debug, Clone, Default)]
pub struct TrackingSystem {
    next_id: u32,
    devices: BTreeMap<DeviceId, TrackedDevice>,
    /// Active devices whose carrier was missing on the last tick.
    orphaned: BTreeSet<DeviceId>,
}

impl TrackingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `device` to `carrier`. The device keeps whatever state it had.
    pub fn attach(&mut self, carrier: EntityId, device: PinpointerDevice) -> DeviceId {
        let id = DeviceId(self.next_id);
        self.next_id += 1;
        self.devices.insert(id, TrackedDevice { carrier, device });
        id
    }

    pub fn detach(&mut self, id: DeviceId) -> Option<TrackedDevice> {
        self.orphaned.remove(&id);
        self.devices.remove(&id)
    }

    pub fn device(&self, id: DeviceId) -> Option<&PinpointerDevice> {
        self.devices.get(&id).map(|tracked| &tracked.device)
    }

    pub fn carrier(&self, id: DeviceId) -> Option<EntityId> {
        self.devices.get(&id).map(|tracked| tracked.carrier)
    }

    pub fn view(&self, id: DeviceId) -> Option<DeviceView> {
        self.devices.get(&id).map(|tracked| DeviceView {
            id,
            carrier: tracked.carrier,
            status: tracked.device.status(),
            reading: tracked.device.reading(),
            snapshot: tracked.device.snapshot(),
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.devices.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Updates every device once, in [`DeviceId`] order.
    ///
    /// Devices whose carrier no longer exists are skipped. The first skip is
    /// logged; the warning repeats only after the carrier has reappeared.
    pub fn tick<W>(&mut self, world: &W) -> Vec<TrackingEvent>
    where
        W: WorldOracle + ?Sized,
    {
        let mut events = Vec::new();

        for (&id, tracked) in self.devices.iter_mut() {
            if !tracked.device.is_active() {
                continue;
            }
            let Some(carrier) = world.resolve_position(tracked.carrier) else {
                if self.orphaned.insert(id) {
                    warn!(device = %id, carrier = %tracked.carrier, "carrier no longer exists");
                }
                continue;
            };
            self.orphaned.remove(&id);

            let before = tracked.device.snapshot();
            let changed = tracked.device.update(carrier, world);
            if changed.is_empty() {
                continue;
            }
            let after = tracked.device.snapshot();
            log_transition(id, changed, &after);
            events.extend(TrackingEvent::from_changes(id, changed, &before, &after));
        }

        events
    }

    /// Whether the last tick skipped `id` because its carrier was missing.
    pub fn is_orphaned(&self, id: DeviceId) -> bool {
        self.orphaned.contains(&id)
    }

    /// Applies `op` to device `id`, measuring from its carrier's position.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DeviceNotFound`] for an unknown device,
    /// [`RuntimeError::CarrierNotFound`] when the operation needs a position
    /// and the carrier is gone, and the core's retarget or config errors.
    pub fn control<W>(
        &mut self,
        id: DeviceId,
        op: DeviceControl,
        world: &W,
    ) -> Result<Vec<TrackingEvent>>
    where
        W: WorldOracle + ?Sized,
    {
        let tracked = self
            .devices
            .get_mut(&id)
            .ok_or(RuntimeError::DeviceNotFound(id))?;
        let carrier_id = tracked.carrier;
        let carrier = || {
            world
                .resolve_position(carrier_id)
                .ok_or(RuntimeError::CarrierNotFound {
                    device: id,
                    carrier: carrier_id,
                })
        };

        let device = &mut tracked.device;
        let before = device.snapshot();

        let changed = match op {
            DeviceControl::Activate => device.activate(carrier()?, world),
            DeviceControl::Deactivate => device.deactivate(),
            DeviceControl::Toggle => {
                if device.is_active() {
                    device.deactivate()
                } else {
                    device.activate(carrier()?, world)
                }
            }
            DeviceControl::Retarget(entity) => {
                let position = carrier()?;
                device.retarget(entity, position, world).inspect_err(|e| {
                    warn!(device = %id, error = %e, "retarget denied");
                })?
            }
            DeviceControl::ClearTarget => device.clear_target(),
            DeviceControl::Scan => device.select_and_store(carrier()?, world),
            DeviceControl::SetCanRetarget(can_retarget) => device.set_can_retarget(can_retarget),
            DeviceControl::ReconfigureCapabilities(capabilities) => {
                device.reconfigure_capabilities(capabilities);
                DeviceFields::empty()
            }
            DeviceControl::SetConfig(config) => device.set_config(config)?,
        };

        let after = device.snapshot();
        log_transition(id, changed, &after);
        Ok(TrackingEvent::from_changes(id, changed, &before, &after))
    }
}

/// Event for a rejected retarget, if `error` is one.
pub(crate) fn denied_event(device: DeviceId, error: &RuntimeError) -> Option<TrackingEvent> {
    match error {
        RuntimeError::Retarget(RetargetError::Denied { current, requested }) => {
            Some(TrackingEvent::RetargetDenied {
                device,
                current: *current,
                requested: *requested,
            })
        }
        _ => None,
    }
}

fn log_transition(id: DeviceId, changed: DeviceFields, after: &PinpointerSnapshot) {
    if changed.contains(DeviceFields::TARGET) {
        match after.target {
            Some(target) => debug!(device = %id, %target, "target acquired"),
            None => debug!(device = %id, "target lost"),
        }
    }
    if changed.contains(DeviceFields::DISTANCE_BAND) {
        debug!(device = %id, band = %after.distance_band, "distance band changed");
    }
}
