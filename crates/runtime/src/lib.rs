//! Runtime orchestration for pinpointer tracking.
//!
//! This crate wires the deterministic [`pinpointer_core`] logic to an
//! in-memory world, a worker task, and a topic-based event bus. Consumers
//! embed [`TrackerRuntime`] and interact with it through [`TrackerHandle`].
//!
//! Modules are organized by responsibility:
//! - [`world`] holds the in-memory [`pinpointer_core::WorldOracle`]
//! - [`system`] owns devices and turns their change masks into events
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod system;
pub mod world;

mod workers;

pub use api::{Result, RuntimeError, TrackerHandle};
pub use events::{ControlEvent, Event, EventBus, Topic};
pub use runtime::{RuntimeConfig, TrackerRuntime, TrackerRuntimeBuilder};
pub use system::{DeviceControl, DeviceId, DeviceView, TrackedDevice, TrackingEvent, TrackingSystem};
pub use workers::TickReport;
pub use world::{MemoryWorld, WorldEntity};
