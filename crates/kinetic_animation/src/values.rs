//! Interpolatable animation values

use kinetic_paint::Color;

/// A value that can be blended between two endpoints
pub trait Interpolate: Clone {
    /// Blend from `self` to `other` at `t` (0.0 = self, 1.0 = other).
    ///
    /// `t` may leave [0, 1] for overshooting easings.
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Color {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Color::mix(*self, *other, t.clamp(0.0, 1.0))
    }
}
