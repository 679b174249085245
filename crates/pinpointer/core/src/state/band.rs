/// Coarse classification of the tile distance to the current target.
///
/// Variants are ordered from "no reading" outward, so `Reached < Close <
/// Medium < Far`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum DistanceBand {
    /// No target is being tracked.
    #[default]
    Unknown,
    /// Within `reached_distance`.
    Reached,
    /// Within `close_distance`.
    Close,
    /// Within `medium_distance`.
    Medium,
    /// Beyond `medium_distance`.
    Far,
}

impl DistanceBand {
    /// Returns true for every band except [`DistanceBand::Unknown`].
    #[inline]
    pub const fn is_known(self) -> bool {
        !matches!(self, DistanceBand::Unknown)
    }
}
