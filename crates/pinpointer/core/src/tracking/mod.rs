//! Behavior that drives a pinpointer.
//!
//! - [`scanner`] finds matching entities and fills the target store
//! - [`updater`] re-measures the current target every tick
//! - [`machine`] owns activation and target switching
//!
//! Every public operation returns a [`DeviceFields`](crate::state::DeviceFields)
//! mask naming the replicated fields it changed.
pub mod machine;
pub mod scanner;
pub mod updater;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use machine::{DeviceStatus, RetargetError};
pub use scanner::{Candidate, scan, select_and_store};
pub use updater::{refresh, update};
