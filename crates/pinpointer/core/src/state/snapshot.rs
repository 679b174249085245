//! Replicated view of a pinpointer.
//!
//! A snapshot carries exactly the fields other processes (clients, save
//! files) need to mirror a device. Configuration stays local.

use super::{Angle, DeviceFields, DistanceBand, EntityId, TargetBuffer};

/// Replicated state of a [`PinpointerDevice`](super::PinpointerDevice).
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinpointerSnapshot {
    pub stored_targets: TargetBuffer,
    pub target: Option<EntityId>,
    pub target_name: Option<String>,
    pub can_retarget: bool,
    pub arrow_angle: Angle,
    pub distance_band: DistanceBand,
    pub is_active: bool,
}

impl PinpointerSnapshot {
    /// Fields that differ between `self` (before) and `after`.
    pub fn changes(&self, after: &PinpointerSnapshot) -> DeviceFields {
        let mut fields = DeviceFields::empty();
        fields.set(
            DeviceFields::STORED_TARGETS,
            self.stored_targets != after.stored_targets,
        );
        fields.set(DeviceFields::TARGET, self.target != after.target);
        fields.set(DeviceFields::TARGET_NAME, self.target_name != after.target_name);
        fields.set(DeviceFields::CAN_RETARGET, self.can_retarget != after.can_retarget);
        fields.set(DeviceFields::ARROW_ANGLE, self.arrow_angle != after.arrow_angle);
        fields.set(
            DeviceFields::DISTANCE_BAND,
            self.distance_band != after.distance_band,
        );
        fields.set(DeviceFields::IS_ACTIVE, self.is_active != after.is_active);
        fields
    }

    #[inline]
    pub fn has_target(&self) -> bool {
        self.distance_band.is_known()
    }
}

/// What a presentation layer shows for a device.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerReading {
    pub arrow_angle: Angle,
    pub distance_band: DistanceBand,
    pub target_name: Option<String>,
    pub is_active: bool,
    pub has_target: bool,
}
