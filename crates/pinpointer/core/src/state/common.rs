use std::f64::consts::{PI, TAU};
use std::fmt;

/// Opaque, stable reference to an entity in the simulated world.
///
/// Worlds allocate ids monotonically and never reuse them, so ordering by id
/// is ordering by creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Continuous world position expressed in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in tiles.
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }

    /// Bearing from `self` towards `other`.
    ///
    /// Coincident positions yield a bearing of zero.
    pub fn bearing_to(self, other: Position) -> Angle {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        Angle::from_radians(dy.atan2(dx))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Angle in radians, always normalized to (-π, π].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f64", into = "f64"))]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Self = Self(0.0);

    /// Wraps an arbitrary radian value into (-π, π].
    pub fn from_radians(radians: f64) -> Self {
        let mut wrapped = radians.rem_euclid(TAU);
        if wrapped > PI {
            wrapped -= TAU;
        }
        Self(wrapped)
    }

    #[inline]
    pub const fn radians(self) -> f64 {
        self.0
    }

    /// Absolute shortest rotation between two angles, in [0, π].
    pub fn delta(self, other: Angle) -> f64 {
        Self::from_radians(other.0 - self.0).0.abs()
    }
}

impl From<f64> for Angle {
    fn from(radians: f64) -> Self {
        Self::from_radians(radians)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} rad", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn normalizes_into_half_open_range() {
        assert!((Angle::from_radians(PI).radians() - PI).abs() < EPS);
        assert!((Angle::from_radians(-PI).radians() - PI).abs() < EPS);
        assert!((Angle::from_radians(3.0 * PI).radians().abs() - PI).abs() < EPS);
        assert!((Angle::from_radians(TAU + 0.5).radians() - 0.5).abs() < EPS);
        assert!((Angle::from_radians(-0.5).radians() + 0.5).abs() < EPS);

        for step in -100..=100 {
            let angle = Angle::from_radians(f64::from(step) * 0.37);
            assert!(angle.radians() > -PI && angle.radians() <= PI);
        }
    }

    #[test]
    fn delta_takes_the_short_way_round() {
        let a = Angle::from_radians(PI - 0.01);
        let b = Angle::from_radians(-PI + 0.01);
        assert!((a.delta(b) - 0.02).abs() < 1e-6);
        assert!((Angle::ZERO.delta(Angle::from_radians(0.12)) - 0.12).abs() < EPS);
    }

    #[test]
    fn bearing_follows_atan2_convention() {
        let origin = Position::ORIGIN;
        assert!(origin.bearing_to(Position::new(1.0, 0.0)).radians().abs() < EPS);
        assert!((origin.bearing_to(Position::new(0.0, 1.0)).radians() - PI / 2.0).abs() < EPS);
        assert!((origin.bearing_to(Position::new(-1.0, 0.0)).radians() - PI).abs() < EPS);
        assert_eq!(origin.bearing_to(origin), Angle::ZERO);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(1.0, 1.0);
        let b = Position::new(4.0, 5.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-6);
    }
}
