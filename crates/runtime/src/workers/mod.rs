//! Worker tasks that back the runtime orchestration.

mod tracking;

pub use tracking::{Command, TickReport, TrackingWorker};
