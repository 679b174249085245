//! Activation lifecycle and target switching.
//!
//! ```text
//!              activate (scan)                 retarget / scan hit
//!  Inactive ───────────────────▶ ActiveUntargeted ─────────────────▶ ActiveTracking
//!     ▲                                ▲                                 │
//!     │          deactivate            │   clear_target / target lost    │
//!     └────────────────────────────────┴─────────────────────────────────┘
//! ```

use crate::env::WorldOracle;
use crate::error::{ErrorSeverity, TrackerError};
use crate::state::{DeviceFields, EntityId, PinpointerDevice, Position};

use super::{scanner, updater};

/// Lifecycle state derived from `is_active` and `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DeviceStatus {
    /// Dormant. No scans or updates are performed.
    Inactive,
    /// Powered on without a target.
    ActiveUntargeted,
    /// Powered on and pointing at a target.
    ActiveTracking,
}

/// Rejected retarget request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetargetError {
    #[error("device is locked onto {current} and cannot retarget to {requested}")]
    Denied {
        current: EntityId,
        requested: EntityId,
    },
}

impl TrackerError for RetargetError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            RetargetError::Denied { .. } => "RETARGET_DENIED",
        }
    }
}

impl PinpointerDevice {
    pub fn status(&self) -> DeviceStatus {
        match (self.is_active, self.target) {
            (false, _) => DeviceStatus::Inactive,
            (true, None) => DeviceStatus::ActiveUntargeted,
            (true, Some(_)) => DeviceStatus::ActiveTracking,
        }
    }

    /// Powers the device on.
    ///
    /// A device that already has a target re-measures it. If there is no
    /// target, or the old one has despawned, the device scans from `carrier`
    /// straight away. Activating an active device does nothing.
    pub fn activate<W>(&mut self, carrier: Position, world: &W) -> DeviceFields
    where
        W: WorldOracle + ?Sized,
    {
        if self.is_active {
            return DeviceFields::empty();
        }

        self.track_changes(|device| {
            device.is_active = true;
            updater::refresh_in_place(device, carrier, world);
            if device.target.is_none() {
                scanner::select_and_store_in_place(device, carrier, world);
            }
        })
    }

    /// Powers the device off. The last reading stays visible.
    pub fn deactivate(&mut self) -> DeviceFields {
        self.track_changes(|device| device.is_active = false)
    }

    /// Flips between [`activate`](Self::activate) and [`deactivate`](Self::deactivate).
    pub fn toggle<W>(&mut self, carrier: Position, world: &W) -> DeviceFields
    where
        W: WorldOracle + ?Sized,
    {
        if self.is_active {
            self.deactivate()
        } else {
            self.activate(carrier, world)
        }
    }

    /// Points the device at `entity` and measures it once.
    ///
    /// Allowed when the device may retarget or has no target. An inactive
    /// device accepts the target and stays inactive. If `entity` does not
    /// exist the device ends up untargeted.
    ///
    /// # Errors
    ///
    /// Returns [`RetargetError::Denied`] without touching the device if it is
    /// locked onto another target.
    pub fn retarget<W>(
        &mut self,
        entity: EntityId,
        carrier: Position,
        world: &W,
    ) -> Result<DeviceFields, RetargetError>
    where
        W: WorldOracle + ?Sized,
    {
        if !self.can_retarget
            && let Some(current) = self.target
        {
            return Err(RetargetError::Denied {
                current,
                requested: entity,
            });
        }

        Ok(self.track_changes(|device| {
            device.target = Some(entity);
            updater::refresh_in_place(device, carrier, world);
        }))
    }

    /// Stops tracking the current target. Stored targets are kept.
    pub fn clear_target(&mut self) -> DeviceFields {
        self.track_changes(|device| device.lose_target())
    }

    /// See [`scanner::select_and_store`].
    pub fn select_and_store<W>(&mut self, origin: Position, world: &W) -> DeviceFields
    where
        W: WorldOracle + ?Sized,
    {
        scanner::select_and_store(self, origin, world)
    }
}
