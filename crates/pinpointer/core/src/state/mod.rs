//! Device state representation.
//!
//! This module owns the data a pinpointer carries: identifiers and geometry,
//! capability sets, distance bands, the bounded target store, and the device
//! record itself. Behavior that mutates a device lives in [`crate::tracking`].
pub mod band;
pub mod capability;
pub mod common;
pub mod device;
pub mod fields;
pub mod snapshot;
pub mod store;

pub use band::DistanceBand;
pub use capability::CapabilitySet;
pub use common::{Angle, EntityId, Position};
pub use device::PinpointerDevice;
pub use fields::DeviceFields;
pub use snapshot::{PinpointerSnapshot, TrackerReading};
pub use store::{TargetBuffer, TargetStore};
