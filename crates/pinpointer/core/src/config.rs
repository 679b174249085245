//! Device configuration and its validation.

use crate::error::{ErrorSeverity, TrackerError};
use crate::state::DistanceBand;

/// Tile distances separating the four distance bands.
///
/// Must satisfy `medium > close > reached > 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DistanceThresholds {
    pub medium: f32,
    pub close: f32,
    pub reached: f32,
}

impl DistanceThresholds {
    pub const DEFAULT_MEDIUM: f32 = 16.0;
    pub const DEFAULT_CLOSE: f32 = 8.0;
    pub const DEFAULT_REACHED: f32 = 1.0;

    pub const fn new(medium: f32, close: f32, reached: f32) -> Self {
        Self {
            medium,
            close,
            reached,
        }
    }

    /// Checks the ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any value is non-finite, non-positive, or
    /// the values are not strictly decreasing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("medium_distance", self.medium),
            ("close_distance", self.close),
            ("reached_distance", self.reached),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteValue { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveThreshold { field, value });
            }
        }

        if !(self.medium > self.close && self.close > self.reached) {
            return Err(ConfigError::ThresholdsNotDecreasing {
                medium: self.medium,
                close: self.close,
                reached: self.reached,
            });
        }

        Ok(())
    }

    /// Maps a tile distance onto its band.
    ///
    /// Bounds are inclusive on the near side: a distance equal to a threshold
    /// falls into the closer band.
    pub fn classify(&self, distance: f32) -> DistanceBand {
        if distance <= self.reached {
            DistanceBand::Reached
        } else if distance <= self.close {
            DistanceBand::Close
        } else if distance <= self.medium {
            DistanceBand::Medium
        } else {
            DistanceBand::Far
        }
    }
}

impl Default for DistanceThresholds {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MEDIUM,
            Self::DEFAULT_CLOSE,
            Self::DEFAULT_REACHED,
        )
    }
}

/// Tunable parameters of a single pinpointer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinpointerConfig {
    /// Number of entities the device remembers from scans.
    pub max_targets: usize,

    /// Band boundaries in tiles.
    pub thresholds: DistanceThresholds,

    /// Minimum bearing change (radians) before the arrow is moved.
    pub angular_precision: f64,

    /// Whether the target's display name follows the target.
    pub update_target_name: bool,

    /// Maximum scan radius in tiles. `None` searches the whole world.
    pub search_range: Option<f32>,
}

impl PinpointerConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hard ceiling for `max_targets`; sizes the inline target buffer.
    pub const MAX_STORED_TARGETS: usize = 64;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_TARGETS: usize = 10;
    pub const DEFAULT_ANGULAR_PRECISION: f64 = 0.09;

    pub fn new() -> Self {
        Self {
            max_targets: Self::DEFAULT_MAX_TARGETS,
            thresholds: DistanceThresholds::default(),
            angular_precision: Self::DEFAULT_ANGULAR_PRECISION,
            update_target_name: true,
            search_range: None,
        }
    }

    pub fn with_max_targets(mut self, max_targets: usize) -> Self {
        self.max_targets = max_targets;
        self
    }

    pub fn with_thresholds(mut self, thresholds: DistanceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_angular_precision(mut self, angular_precision: f64) -> Self {
        self.angular_precision = angular_precision;
        self
    }

    pub fn with_update_target_name(mut self, update_target_name: bool) -> Self {
        self.update_target_name = update_target_name;
        self
    }

    pub fn with_search_range(mut self, search_range: Option<f32>) -> Self {
        self.search_range = search_range;
        self
    }

    /// Validates every field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_targets == 0 {
            return Err(ConfigError::NonPositiveCapacity);
        }
        if self.max_targets > Self::MAX_STORED_TARGETS {
            return Err(ConfigError::CapacityTooLarge {
                requested: self.max_targets,
                max: Self::MAX_STORED_TARGETS,
            });
        }

        self.thresholds.validate()?;

        if !self.angular_precision.is_finite() {
            return Err(ConfigError::NonFiniteValue {
                field: "angular_precision",
            });
        }
        if self.angular_precision < 0.0 {
            return Err(ConfigError::NegativePrecision(self.angular_precision));
        }

        if let Some(range) = self.search_range
            && !(range.is_finite() && range > 0.0)
        {
            return Err(ConfigError::InvalidSearchRange(range));
        }

        Ok(())
    }
}

impl Default for PinpointerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reasons a configuration is rejected before it reaches a device.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_targets must be at least 1")]
    NonPositiveCapacity,

    #[error("max_targets {requested} exceeds the supported maximum of {max}")]
    CapacityTooLarge { requested: usize, max: usize },

    #[error("{field} must be positive (got {value})")]
    NonPositiveThreshold { field: &'static str, value: f32 },

    #[error(
        "distance thresholds must be strictly decreasing (medium {medium}, close {close}, reached {reached})"
    )]
    ThresholdsNotDecreasing { medium: f32, close: f32, reached: f32 },

    #[error("{field} must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("angular_precision must not be negative (got {0})")]
    NegativePrecision(f64),

    #[error("search_range must be finite and positive (got {0})")]
    InvalidSearchRange(f32),
}

impl TrackerError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ConfigError::*;
        match self {
            NonPositiveCapacity => "CONFIG_NON_POSITIVE_CAPACITY",
            CapacityTooLarge { .. } => "CONFIG_CAPACITY_TOO_LARGE",
            NonPositiveThreshold { .. } => "CONFIG_NON_POSITIVE_THRESHOLD",
            ThresholdsNotDecreasing { .. } => "CONFIG_THRESHOLDS_NOT_DECREASING",
            NonFiniteValue { .. } => "CONFIG_NON_FINITE_VALUE",
            NegativePrecision(_) => "CONFIG_NEGATIVE_PRECISION",
            InvalidSearchRange(_) => "CONFIG_INVALID_SEARCH_RANGE",
        }
    }
}
