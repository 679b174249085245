//! Data-driven pinpointer content.
//!
//! This crate turns data files into values the core and runtime understand:
//! - Device profiles (configuration, search set, retarget lock) via TOML
//! - Simulation scenarios (entities, devices, scripted events) via RON
//!
//! Bundled examples live under `data/` next to this crate.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, DeviceProfile, DeviceSpec, EntitySpec, LoadResult, Scenario, ScenarioLoader,
    ScriptAction, ScriptStep, bundled_data_dir,
};
