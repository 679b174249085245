//! Candidate scanning and nearest-target selection.

use crate::env::WorldOracle;
use crate::state::{CapabilitySet, DeviceFields, EntityId, PinpointerDevice, Position};

use super::updater;

/// A matching entity with its distance from the scan origin.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub entity: EntityId,
    pub position: Position,
    pub distance: f32,
}

/// Lists entities declaring any of `capabilities`, nearest first.
///
/// Equidistant entities are ordered by [`EntityId`], i.e. creation order, so
/// the same world always produces the same ranking. No match yields an empty
/// vector.
pub fn scan<W>(
    origin: Position,
    capabilities: CapabilitySet,
    range: Option<f32>,
    world: &W,
) -> Vec<Candidate>
where
    W: WorldOracle + ?Sized,
{
    if capabilities.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<Candidate> = world
        .query_by_capability(capabilities, origin, range)
        .into_iter()
        .map(|hit| Candidate {
            entity: hit.entity,
            position: hit.position,
            distance: origin.distance_to(hit.position),
        })
        .filter(|candidate| range.is_none_or(|r| candidate.distance <= r))
        .collect();

    candidates.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.entity.cmp(&b.entity))
    });
    candidates.dedup_by_key(|candidate| candidate.entity);
    candidates
}

/// Scans from `origin` with the device's capability set and records results.
///
/// - The nearest match becomes the target if the device may retarget or has
///   no target yet, and is measured immediately.
/// - Matches are remembered nearest-first until the store is full; known
///   entities are skipped and the overflow is dropped.
/// - An empty scan clears the target but keeps the stored history.
pub fn select_and_store<W>(device: &mut PinpointerDevice, origin: Position, world: &W) -> DeviceFields
where
    W: WorldOracle + ?Sized,
{
    device.track_changes(|device| select_and_store_in_place(device, origin, world))
}

pub(crate) fn select_and_store_in_place<W>(
    device: &mut PinpointerDevice,
    origin: Position,
    world: &W,
) where
    W: WorldOracle + ?Sized,
{
    let candidates = scan(
        origin,
        device.capabilities,
        device.config.search_range,
        world,
    );

    let Some(nearest) = candidates.first() else {
        device.lose_target();
        return;
    };

    // A despawned target no longer holds the lock.
    if device.target.is_some_and(|target| !world.contains(target)) {
        device.lose_target();
    }
    if device.can_retarget || device.target.is_none() {
        device.target = Some(nearest.entity);
    }

    for candidate in &candidates {
        if device.stored_targets.is_full() {
            break;
        }
        device.stored_targets.add(candidate.entity);
    }

    updater::refresh_in_place(device, origin, world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PinpointerConfig;
    use crate::state::DistanceBand;
    use crate::tracking::test_helpers::FakeWorld;

    fn disk_pointer() -> PinpointerDevice {
        PinpointerDevice::new(PinpointerConfig::default(), CapabilitySet::NUCLEAR_DISK).unwrap()
    }

    #[test]
    fn scan_orders_by_distance_then_creation() {
        let mut world = FakeWorld::new();
        world.insert(1, Position::new(5.0, 0.0), CapabilitySet::NUCLEAR_DISK);
        world.insert(2, Position::new(0.0, 3.0), CapabilitySet::NUCLEAR_DISK);
        world.insert(3, Position::new(-5.0, 0.0), CapabilitySet::NUCLEAR_DISK);
        world.insert(4, Position::new(1.0, 1.0), CapabilitySet::ANOMALY);

        let found = scan(
            Position::ORIGIN,
            CapabilitySet::NUCLEAR_DISK,
            None,
            &world,
        );
        let ids: Vec<_> = found.iter().map(|c| c.entity).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(1), EntityId(3)]);
        assert!((found[0].distance - 3.0).abs() < 1e-6);
    }

    #[test]
    fn scan_matches_any_requested_capability() {
        let mut world = FakeWorld::new();
        world.insert(1, Position::new(2.0, 0.0), CapabilitySet::ANOMALY);
        world.insert(2, Position::new(1.0, 0.0), CapabilitySet::DISTRESS_BEACON);
        world.insert(3, Position::new(3.0, 0.0), CapabilitySet::BLACK_BOX);

        let found = scan(
            Position::ORIGIN,
            CapabilitySet::ANOMALY | CapabilitySet::DISTRESS_BEACON,
            None,
            &world,
        );
        let ids: Vec<_> = found.iter().map(|c| c.entity).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(1)]);
    }

    #[test]
    fn scan_respects_range_and_empty_sets() {
        let mut world = FakeWorld::new();
        world.insert(1, Position::new(2.0, 0.0), CapabilitySet::ANOMALY);
        world.insert(2, Position::new(20.0, 0.0), CapabilitySet::ANOMALY);

        let near = scan(Position::ORIGIN, CapabilitySet::ANOMALY, Some(5.0), &world);
        assert_eq!(near.len(), 1);
        assert!(scan(Position::ORIGIN, CapabilitySet::empty(), None, &world).is_empty());
        assert!(scan(Position::ORIGIN, CapabilitySet::BLACK_BOX, None, &world).is_empty());
    }

    #[test]
    fn stores_ten_nearest_of_fifteen() {
        let mut world = FakeWorld::new();
        // Created farthest-first so creation order disagrees with distance.
        for i in 0..15u32 {
            let distance = (15 - i) as f32 * 2.0;
            world.insert(i + 1, Position::new(distance, 0.0), CapabilitySet::NUCLEAR_DISK);
        }

        let mut device = disk_pointer();
        let changed = select_and_store(&mut device, Position::ORIGIN, &world);

        let expected: Vec<_> = (6..=15).rev().map(EntityId).collect();
        assert_eq!(device.stored_targets().as_slice(), expected.as_slice());
        assert_eq!(device.target(), Some(EntityId(15)));
        assert_eq!(device.distance_band(), DistanceBand::Close);
        assert!(changed.contains(
            DeviceFields::STORED_TARGETS | DeviceFields::TARGET | DeviceFields::DISTANCE_BAND
        ));
    }

    #[test]
    fn rescan_skips_known_entities() {
        let mut world = FakeWorld::new();
        world.insert(1, Position::new(1.0, 0.0), CapabilitySet::NUCLEAR_DISK);
        world.insert(2, Position::new(2.0, 0.0), CapabilitySet::NUCLEAR_DISK);

        let mut device = disk_pointer();
        select_and_store(&mut device, Position::ORIGIN, &world);
        world.insert(3, Position::new(0.5, 0.0), CapabilitySet::NUCLEAR_DISK);
        select_and_store(&mut device, Position::ORIGIN, &world);

        assert_eq!(
            device.stored_targets().as_slice(),
            &[EntityId(1), EntityId(2), EntityId(3)]
        );
        // Locked device keeps its first target.
        assert_eq!(device.target(), Some(EntityId(1)));
    }

    #[test]
    fn retargetable_device_follows_nearest() {
        let mut world = FakeWorld::new();
        world.insert(1, Position::new(4.0, 0.0), CapabilitySet::NUCLEAR_DISK);

        let mut device = disk_pointer().with_can_retarget(true);
        select_and_store(&mut device, Position::ORIGIN, &world);
        world.insert(2, Position::new(0.5, 0.0), CapabilitySet::NUCLEAR_DISK);
        select_and_store(&mut device, Position::ORIGIN, &world);

        assert_eq!(device.target(), Some(EntityId(2)));
        assert_eq!(device.distance_band(), DistanceBand::Reached);
        assert_eq!(device.target_name(), Some("entity 2"));
    }

    #[test]
    fn empty_scan_clears_target_but_keeps_history() {
        let mut world = FakeWorld::new();
        let disk = world.insert(1, Position::new(4.0, 0.0), CapabilitySet::NUCLEAR_DISK);

        let mut device = disk_pointer();
        select_and_store(&mut device, Position::ORIGIN, &world);
        assert_eq!(device.target(), Some(disk));

        world.remove(disk);
        let changed = select_and_store(&mut device, Position::ORIGIN, &world);

        assert_eq!(device.target(), None);
        assert_eq!(device.distance_band(), DistanceBand::Unknown);
        assert_eq!(device.stored_targets().as_slice(), &[disk]);
        assert!(!changed.contains(DeviceFields::STORED_TARGETS));
    }

    #[test]
    fn locked_device_replaces_despawned_target() {
        let mut world = FakeWorld::new();
        let first = world.insert(1, Position::new(3.0, 0.0), CapabilitySet::NUCLEAR_DISK);

        let mut device = disk_pointer();
        select_and_store(&mut device, Position::ORIGIN, &world);
        assert_eq!(device.target(), Some(first));

        world.remove(first);
        let second = world.insert(2, Position::new(5.0, 0.0), CapabilitySet::NUCLEAR_DISK);
        let changed = select_and_store(&mut device, Position::ORIGIN, &world);

        assert_eq!(device.target(), Some(second));
        assert_eq!(device.distance_band(), DistanceBand::Close);
        assert!(changed.contains(DeviceFields::TARGET));
    }

    #[test]
    fn store_never_exceeds_capacity_across_scans() {
        let mut world = FakeWorld::new();
        let config = PinpointerConfig::new().with_max_targets(4);
        let mut device = PinpointerDevice::new(config, CapabilitySet::ANOMALY).unwrap();

        for round in 0..6u32 {
            for k in 0..3u32 {
                let id = round * 3 + k + 1;
                world.insert(id, Position::new(id as f32, 0.0), CapabilitySet::ANOMALY);
            }
            select_and_store(&mut device, Position::ORIGIN, &world);
            if round % 2 == 1 {
                device.evict_oldest_stored_target();
            }

            assert!(device.stored_targets().len() <= 4);
            let mut ids: Vec<_> = device.stored_targets().iter().collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), device.stored_targets().len());
        }
    }
}
