//! Simplified two-body orbits
//!
//! Orbits are ellipses centred on the parent body. The orbital angle grows
//! linearly with time, `angle += 2π / period * dt`, and is wrapped into
//! `[0, 2π)` after every step so f32 increments never round away.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::body::BodyHandle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Orbit of a planet around its star or a moon around its planet
///
/// `orbital_period` is always positive; the body factory guarantees it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Semi-major axis `a` (world units)
    pub semi_major_axis: f32,
    /// Eccentricity `e` in `[0, 1)`
    pub eccentricity: f32,
    /// Time for one full revolution (seconds)
    pub orbital_period: f32,
    /// Current orbital angle (radians, `[0, 2π)` once advanced)
    pub angle: f32,
    /// Tilt of the orbital plane (radians)
    pub inclination: f32,
    /// Body this orbit revolves around
    pub parent: BodyHandle,
}

impl OrbitState {
    /// Semi-minor axis `b = a * sqrt(1 - e²)`
    #[inline]
    pub fn semi_minor_axis(&self) -> f32 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    /// Angular speed `2π / period` (radians per second)
    #[inline]
    pub fn angular_velocity(&self) -> f32 {
        TAU / self.orbital_period
    }

    /// Offset from the parent at the current angle
    pub fn offset(&self) -> Vec3 {
        self.offset_at(self.angle)
    }

    /// Offset from the parent at an arbitrary angle
    ///
    /// The planar point `(a cos θ, b sin θ)` is tilted about the x axis by the
    /// inclination, moving part of `y` into `z`.
    pub fn offset_at(&self, angle: f32) -> Vec3 {
        let x = self.semi_major_axis * angle.cos();
        let y = self.semi_minor_axis() * angle.sin();
        let (sin_i, cos_i) = self.inclination.sin_cos();
        Vec3::new(x, y * cos_i, y * sin_i)
    }

    /// World position given the parent's position
    #[inline]
    pub fn position(&self, parent_position: Vec3) -> Vec3 {
        parent_position + self.offset()
    }

    /// Advance the orbit by `delta_time` and return the new world position
    pub fn advance(&mut self, parent_position: Vec3, delta_time: f32) -> Vec3 {
        self.angle = (self.angle + self.angular_velocity() * delta_time).rem_euclid(TAU);
        self.position(parent_position)
    }

    /// Closed polyline of the orbit for display
    ///
    /// Returns `segments + 1` points; the last repeats the first.
    pub fn trace_path(&self, parent_position: Vec3, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(3);
        (0..=segments)
            .map(|i| {
                let angle = TAU * (i % segments) as f32 / segments as f32;
                parent_position + self.offset_at(angle)
            })
            .collect()
    }
}
