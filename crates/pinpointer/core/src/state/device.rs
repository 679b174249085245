use super::{
    Angle, CapabilitySet, DeviceFields, DistanceBand, EntityId, PinpointerSnapshot, TargetStore,
    TrackerReading,
};
use crate::config::{ConfigError, PinpointerConfig};

/// State of one pinpointer item.
///
/// Fields are only reachable through methods so that the store capacity and
/// the band/target invariant cannot be broken from outside.
///
/// # Invariants
///
/// - `stored_targets.len() <= config.max_targets`
/// - `distance_band == DistanceBand::Unknown` iff `target.is_none()`
/// - `config` has passed [`PinpointerConfig::validate`]
///
/// Behavior lives in [`crate::tracking`]: scanning, per-tick updates and the
/// activation state machine.
#[derive(Clone, Debug, PartialEq)]
pub struct PinpointerDevice {
    pub(crate) config: PinpointerConfig,
    pub(crate) capabilities: CapabilitySet,
    pub(crate) stored_targets: TargetStore,
    pub(crate) target: Option<EntityId>,
    pub(crate) target_name: Option<String>,
    pub(crate) can_retarget: bool,
    pub(crate) is_active: bool,
    pub(crate) arrow_angle: Angle,
    pub(crate) distance_band: DistanceBand,
}

impl PinpointerDevice {
    /// Creates an inactive, untargeted device.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` is invalid.
    pub fn new(config: PinpointerConfig, capabilities: CapabilitySet) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            stored_targets: TargetStore::with_capacity(config.max_targets),
            config,
            capabilities,
            target: None,
            target_name: None,
            can_retarget: false,
            is_active: false,
            arrow_angle: Angle::ZERO,
            distance_band: DistanceBand::Unknown,
        })
    }

    pub fn with_can_retarget(mut self, can_retarget: bool) -> Self {
        self.can_retarget = can_retarget;
        self
    }

    // ===== read-only surface =====

    pub fn config(&self) -> &PinpointerConfig {
        &self.config
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn stored_targets(&self) -> &TargetStore {
        &self.stored_targets
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    pub fn can_retarget(&self) -> bool {
        self.can_retarget
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn arrow_angle(&self) -> Angle {
        self.arrow_angle
    }

    pub fn distance_band(&self) -> DistanceBand {
        self.distance_band
    }

    pub fn has_target(&self) -> bool {
        self.distance_band.is_known()
    }

    /// What the indicator should currently show.
    pub fn reading(&self) -> TrackerReading {
        TrackerReading {
            arrow_angle: self.arrow_angle,
            distance_band: self.distance_band,
            target_name: self.target_name.clone(),
            is_active: self.is_active,
            has_target: self.has_target(),
        }
    }

    /// Captures the replicated fields.
    pub fn snapshot(&self) -> PinpointerSnapshot {
        PinpointerSnapshot {
            stored_targets: self.stored_targets.as_slice().iter().copied().collect(),
            target: self.target,
            target_name: self.target_name.clone(),
            can_retarget: self.can_retarget,
            arrow_angle: self.arrow_angle,
            distance_band: self.distance_band,
            is_active: self.is_active,
        }
    }

    /// Overwrites the replicated fields from `snapshot`, keeping local config.
    ///
    /// Stored targets beyond this device's capacity are dropped. A snapshot
    /// without a target always restores as [`DistanceBand::Unknown`], and one
    /// whose band is unknown restores without a target.
    pub fn apply_snapshot(&mut self, snapshot: &PinpointerSnapshot) -> DeviceFields {
        self.track_changes(|device| {
            device
                .stored_targets
                .replace(snapshot.stored_targets.iter().copied());
            device.target_name = snapshot.target_name.clone();
            device.can_retarget = snapshot.can_retarget;
            device.arrow_angle = snapshot.arrow_angle;
            device.is_active = snapshot.is_active;
            match (snapshot.target, snapshot.distance_band) {
                (Some(target), band) if band.is_known() => {
                    device.target = Some(target);
                    device.distance_band = band;
                }
                _ => {
                    device.target = None;
                    device.distance_band = DistanceBand::Unknown;
                }
            }
        })
    }

    // ===== configuration =====

    /// Replaces the search set used by the next scan.
    pub fn reconfigure_capabilities(&mut self, capabilities: CapabilitySet) {
        self.capabilities = capabilities;
    }

    pub fn set_can_retarget(&mut self, can_retarget: bool) -> DeviceFields {
        self.track_changes(|device| device.can_retarget = can_retarget)
    }

    /// Applies a new configuration.
    ///
    /// If the new capacity is smaller than the number of stored targets, the
    /// oldest entries are evicted. The current target is left alone.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] and leaves the device untouched if `config`
    /// is invalid.
    pub fn set_config(&mut self, config: PinpointerConfig) -> Result<DeviceFields, ConfigError> {
        config.validate()?;
        Ok(self.track_changes(|device| {
            device.stored_targets.resize(config.max_targets);
            device.config = config;
        }))
    }

    // ===== target store =====

    /// Remembers `entity` unless it is already stored or the store is full.
    pub fn add_stored_target(&mut self, entity: EntityId) -> bool {
        self.stored_targets.add(entity)
    }

    /// Forgets the oldest remembered entity to make room for another.
    pub fn evict_oldest_stored_target(&mut self) -> Option<EntityId> {
        self.stored_targets.evict_oldest()
    }

    /// Forgets `entity`. If it was the current target, tracking stops.
    pub fn remove_stored_target(&mut self, entity: EntityId) -> DeviceFields {
        self.track_changes(|device| {
            if device.stored_targets.remove(entity) && device.target == Some(entity) {
                device.lose_target();
            }
        })
    }

    /// Forgets every remembered entity.
    ///
    /// The current target is dropped only if it was one of them; a target
    /// assigned directly keeps being tracked.
    pub fn clear_stored_targets(&mut self) -> DeviceFields {
        self.track_changes(|device| {
            let target_was_stored = device
                .target
                .is_some_and(|target| device.stored_targets.contains(target));
            device.stored_targets.clear();
            if target_was_stored {
                device.lose_target();
            }
        })
    }

    // ===== internal helpers =====

    /// Runs `mutate` and reports which replicated fields it changed.
    pub(crate) fn track_changes(&mut self, mutate: impl FnOnce(&mut Self)) -> DeviceFields {
        let before = self.snapshot();
        mutate(self);
        before.changes(&self.snapshot())
    }

    /// Drops the current target and resets the reading.
    pub(crate) fn lose_target(&mut self) {
        self.target = None;
        self.distance_band = DistanceBand::Unknown;
        if self.config.update_target_name {
            self.target_name = None;
        }
    }
}

impl Default for PinpointerDevice {
    fn default() -> Self {
        Self {
            config: PinpointerConfig::default(),
            capabilities: CapabilitySet::empty(),
            stored_targets: TargetStore::default(),
            target: None,
            target_name: None,
            can_retarget: false,
            is_active: false,
            arrow_angle: Angle::ZERO,
            distance_band: DistanceBand::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DistanceThresholds;

    fn tracking(target: EntityId) -> PinpointerDevice {
        let mut device = PinpointerDevice::default();
        device.target = Some(target);
        device.distance_band = DistanceBand::Close;
        device.target_name = Some("beacon".into());
        device
    }

    #[test]
    fn new_device_is_dormant_and_empty() {
        let device = PinpointerDevice::new(
            PinpointerConfig::default(),
            CapabilitySet::NUCLEAR_DISK,
        )
        .unwrap();
        assert!(!device.is_active());
        assert!(!device.has_target());
        assert!(device.stored_targets().is_empty());
        assert_eq!(device.stored_targets().capacity(), 10);
        assert_eq!(device.distance_band(), DistanceBand::Unknown);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = PinpointerConfig::new().with_thresholds(DistanceThresholds::new(1.0, 8.0, 16.0));
        assert!(matches!(
            PinpointerDevice::new(config, CapabilitySet::empty()),
            Err(ConfigError::ThresholdsNotDecreasing { .. })
        ));
    }

    #[test]
    fn removing_the_stored_target_stops_tracking() {
        let mut device = tracking(EntityId(2));
        device.add_stored_target(EntityId(1));
        device.add_stored_target(EntityId(2));

        let changed = device.remove_stored_target(EntityId(2));
        assert!(changed.contains(DeviceFields::TARGET | DeviceFields::DISTANCE_BAND));
        assert_eq!(device.target(), None);
        assert_eq!(device.distance_band(), DistanceBand::Unknown);
        assert_eq!(device.target_name(), None);
        assert_eq!(device.stored_targets().as_slice(), &[EntityId(1)]);
    }

    #[test]
    fn removing_another_entry_keeps_target() {
        let mut device = tracking(EntityId(2));
        device.add_stored_target(EntityId(1));
        device.add_stored_target(EntityId(2));

        let changed = device.remove_stored_target(EntityId(1));
        assert_eq!(changed, DeviceFields::STORED_TARGETS);
        assert_eq!(device.target(), Some(EntityId(2)));
    }

    #[test]
    fn clear_keeps_externally_assigned_target() {
        let mut device = tracking(EntityId(9));
        device.add_stored_target(EntityId(1));

        device.clear_stored_targets();
        assert!(device.stored_targets().is_empty());
        assert_eq!(device.target(), Some(EntityId(9)));
        assert!(device.has_target());
    }

    #[test]
    fn clear_drops_stored_target() {
        let mut device = tracking(EntityId(1));
        device.add_stored_target(EntityId(1));

        device.clear_stored_targets();
        assert_eq!(device.target(), None);
        assert!(!device.has_target());
    }

    #[test]
    fn shrinking_capacity_evicts_oldest() {
        let mut device = PinpointerDevice::default();
        for id in 1..=5 {
            device.add_stored_target(EntityId(id));
        }

        let changed = device
            .set_config(PinpointerConfig::new().with_max_targets(3))
            .unwrap();
        assert_eq!(changed, DeviceFields::STORED_TARGETS);
        assert_eq!(
            device.stored_targets().as_slice(),
            &[EntityId(3), EntityId(4), EntityId(5)]
        );
    }

    #[test]
    fn invalid_config_leaves_device_untouched() {
        let mut device = PinpointerDevice::default();
        let before = device.clone();
        assert!(device
            .set_config(PinpointerConfig::new().with_max_targets(0))
            .is_err());
        assert_eq!(device, before);
    }

    #[test]
    fn snapshot_round_trips_through_apply() {
        let mut source = tracking(EntityId(4));
        source.add_stored_target(EntityId(4));
        source.is_active = true;
        source.arrow_angle = Angle::from_radians(-1.0);

        let mut replica = PinpointerDevice::default();
        let changed = replica.apply_snapshot(&source.snapshot());
        assert!(changed.contains(DeviceFields::TARGET | DeviceFields::IS_ACTIVE));
        assert_eq!(replica.reading(), source.reading());
        assert_eq!(replica.snapshot(), source.snapshot());
    }

    #[test]
    fn snapshot_without_target_restores_unknown_band() {
        let snapshot = PinpointerSnapshot {
            distance_band: DistanceBand::Far,
            ..Default::default()
        };
        let mut device = PinpointerDevice::default();
        device.apply_snapshot(&snapshot);
        assert_eq!(device.distance_band(), DistanceBand::Unknown);
    }

    #[test]
    fn snapshot_with_unknown_band_restores_untargeted() {
        let snapshot = PinpointerSnapshot {
            target: Some(EntityId(5)),
            distance_band: DistanceBand::Unknown,
            ..Default::default()
        };
        let mut device = tracking(EntityId(2));
        let changed = device.apply_snapshot(&snapshot);

        assert_eq!(device.target(), None);
        assert_eq!(device.distance_band(), DistanceBand::Unknown);
        assert!(!device.has_target());
        assert!(changed.contains(DeviceFields::TARGET | DeviceFields::DISTANCE_BAND));
    }
}
