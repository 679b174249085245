//! Device profile loader.

use std::path::Path;

use pinpointer_core::{CapabilitySet, PinpointerConfig, PinpointerDevice};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Everything needed to build a [`PinpointerDevice`] from data.
///
/// ```toml
/// capabilities = "NUCLEAR_DISK"
/// can_retarget = false
///
/// [config]
/// max_targets = 10
/// angular_precision = 0.09
///
/// [config.thresholds]
/// medium = 16.0
/// close = 8.0
/// reached = 1.0
/// ```
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub config: PinpointerConfig,
    pub capabilities: CapabilitySet,
    pub can_retarget: bool,
}

impl DeviceProfile {
    /// Builds an inactive device from this profile.
    pub fn build(&self) -> LoadResult<PinpointerDevice> {
        let device = PinpointerDevice::new(self.config.clone(), self.capabilities)?
            .with_can_retarget(self.can_retarget);
        Ok(device)
    }
}

/// Loader for device profiles from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a profile from a TOML file.
    pub fn load(path: &Path) -> LoadResult<DeviceProfile> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid profile {}: {:#}", path.display(), e))
    }

    /// Parse and validate a profile from TOML text.
    pub fn parse(content: &str) -> LoadResult<DeviceProfile> {
        let profile: DeviceProfile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse profile TOML: {}", e))?;

        profile.config.validate()?;
        Ok(profile)
    }
}
