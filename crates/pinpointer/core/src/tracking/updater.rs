//! Per-tick recomputation of bearing, distance band and target name.

use crate::env::WorldOracle;
use crate::state::{Angle, DeviceFields, PinpointerDevice, Position};

/// Recomputes the reading of an active, targeted device.
///
/// Does nothing for an inactive or untargeted device. Returns the replicated
/// fields that changed; calling it again with unchanged positions returns an
/// empty mask.
pub fn update<W>(device: &mut PinpointerDevice, carrier: Position, world: &W) -> DeviceFields
where
    W: WorldOracle + ?Sized,
{
    if !device.is_active || device.target.is_none() {
        return DeviceFields::empty();
    }
    refresh(device, carrier, world)
}

/// Measures the current target regardless of whether the device is active.
///
/// Used right after a target is assigned so the band never reads
/// [`Unknown`](crate::state::DistanceBand::Unknown) while a target is set.
pub fn refresh<W>(device: &mut PinpointerDevice, carrier: Position, world: &W) -> DeviceFields
where
    W: WorldOracle + ?Sized,
{
    device.track_changes(|device| refresh_in_place(device, carrier, world))
}

pub(crate) fn refresh_in_place<W>(device: &mut PinpointerDevice, carrier: Position, world: &W)
where
    W: WorldOracle + ?Sized,
{
    let Some(target) = device.target else {
        return;
    };

    // Handles are never assumed valid across ticks.
    let Some(target_position) = world.resolve_position(target) else {
        device.lose_target();
        return;
    };

    device.apply_bearing(carrier.bearing_to(target_position));
    device.distance_band = device
        .config
        .thresholds
        .classify(carrier.distance_to(target_position));

    if device.config.update_target_name {
        device.target_name = world.display_name(target);
    }
}

impl PinpointerDevice {
    /// Moves the arrow to `bearing` if it differs from the shown angle by more
    /// than `angular_precision`.
    ///
    /// Returns true if the arrow moved.
    pub fn apply_bearing(&mut self, bearing: Angle) -> bool {
        if self.arrow_angle.delta(bearing) > self.config.angular_precision {
            self.arrow_angle = bearing;
            true
        } else {
            false
        }
    }

    /// See [`update`].
    pub fn update<W>(&mut self, carrier: Position, world: &W) -> DeviceFields
    where
        W: WorldOracle + ?Sized,
    {
        update(self, carrier, world)
    }
}
