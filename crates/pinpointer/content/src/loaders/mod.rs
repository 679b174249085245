//! Content loaders for reading pinpointer data from files.

pub mod config;
pub mod scenario;

pub use config::{ConfigLoader, DeviceProfile};
pub use scenario::{DeviceSpec, EntitySpec, Scenario, ScenarioLoader, ScriptAction, ScriptStep};

use std::path::{Path, PathBuf};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Directory holding the profiles and scenarios shipped with this crate.
pub fn bundled_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
