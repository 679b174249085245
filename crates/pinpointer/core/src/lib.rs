//! Deterministic pinpointer logic.
//!
//! `pinpointer-core` models a carried tracking device: it scans the world for
//! entities with matching capabilities, locks onto the nearest one, and keeps
//! an arrow angle and a coarse distance band up to date as the carrier and
//! the target move. The world is reached only through the
//! [`env::WorldOracle`] trait; the crate does no I/O.
pub mod config;
pub mod env;
pub mod error;
pub mod state;
pub mod tracking;

pub use config::{ConfigError, DistanceThresholds, PinpointerConfig};
pub use env::{CandidateHit, WorldOracle};
pub use error::{ErrorSeverity, TrackerError};
pub use state::{
    Angle, CapabilitySet, DeviceFields, DistanceBand, EntityId, PinpointerDevice,
    PinpointerSnapshot, Position, TargetStore, TrackerReading,
};
pub use tracking::{Candidate, DeviceStatus, RetargetError, scan, select_and_store, update};
