//! Celestial body records
//!
//! One record type covers stars, planets, moons and asteroids. Kind-specific
//! data lives in [`BodyDetails`], so an orbit only exists on bodies that orbit
//! and a light only on stars.

use glam::Vec3;
use std::fmt;

use crate::mesh::MeshGeometry;
use crate::orbit::OrbitState;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Body kind tag
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Light-emitting center of the system
    Star,
    /// Orbits the star
    Planet,
    /// Orbits a planet
    Moon,
    /// Free-floating, non-orbiting debris
    Asteroid,
}

impl BodyKind {
    /// Human-readable name of the kind
    pub fn name(self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet => "Planet",
            BodyKind::Moon => "Moon",
            BodyKind::Asteroid => "Asteroid",
        }
    }

    /// Whether bodies of this kind carry an orbit
    pub fn is_orbiting(self) -> bool {
        matches!(self, BodyKind::Planet | BodyKind::Moon)
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a body in its system's body list
///
/// Handles are non-owning: they stay valid for as long as the generation pass
/// that produced them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

impl BodyHandle {
    /// Position in the body list
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Point light attached to a star (metadata for the renderer)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Light color as `0xRRGGBB`
    pub color: u32,
    /// Luminous intensity
    pub intensity: f32,
    /// Distance falloff exponent
    pub decay: f32,
}

/// Kind-specific data
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum BodyDetails {
    Star { light: PointLight },
    Planet { orbit: OrbitState },
    Moon { orbit: OrbitState },
    Asteroid,
}

impl BodyDetails {
    /// Kind tag for these details
    pub fn kind(&self) -> BodyKind {
        match self {
            BodyDetails::Star { .. } => BodyKind::Star,
            BodyDetails::Planet { .. } => BodyKind::Planet,
            BodyDetails::Moon { .. } => BodyKind::Moon,
            BodyDetails::Asteroid => BodyKind::Asteroid,
        }
    }

    /// Orbit, for planets and moons
    pub fn orbit(&self) -> Option<&OrbitState> {
        match self {
            BodyDetails::Planet { orbit } | BodyDetails::Moon { orbit } => Some(orbit),
            BodyDetails::Star { .. } | BodyDetails::Asteroid => None,
        }
    }

    /// Mutable orbit, for planets and moons
    pub fn orbit_mut(&mut self) -> Option<&mut OrbitState> {
        match self {
            BodyDetails::Planet { orbit } | BodyDetails::Moon { orbit } => Some(orbit),
            BodyDetails::Star { .. } | BodyDetails::Asteroid => None,
        }
    }
}

/// A generated star, planet, moon or asteroid
///
/// Created once per generation pass and mutated every simulation step by
/// rotation and, for orbiting kinds, orbital motion. The mesh is owned by the
/// body and expressed in body-local coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    /// Generated display name
    pub name: String,
    /// Radius scale (edge length for asteroids)
    pub size: f32,
    /// Surface color as `0xRRGGBB`
    pub color: u32,
    /// Density used for the mass law
    pub density: f32,
    /// `size³ * density`
    pub mass: f32,
    /// Gravitational influence radius, `mass^(1/3)`
    pub pull_radius: f32,
    /// Surface geometry in body-local space
    pub mesh: MeshGeometry,
    /// Accumulated Euler angles (radians)
    pub rotation: Vec3,
    /// Spin rate per axis (radians per second)
    pub rotation_rate: Vec3,
    /// World-space center
    pub position: Vec3,
    /// Kind-specific data
    pub details: BodyDetails,
}

impl CelestialBody {
    /// Get the kind tag
    #[inline]
    pub fn kind(&self) -> BodyKind {
        self.details.kind()
    }

    /// Orbit, for planets and moons
    #[inline]
    pub fn orbit(&self) -> Option<&OrbitState> {
        self.details.orbit()
    }

    /// Parent handle, for planets and moons
    #[inline]
    pub fn parent(&self) -> Option<BodyHandle> {
        self.orbit().map(|o| o.parent)
    }

    /// Star light descriptor
    pub fn light(&self) -> Option<&PointLight> {
        match &self.details {
            BodyDetails::Star { light } => Some(light),
            _ => None,
        }
    }

    /// Accumulate spin over `delta_time`
    pub fn rotate(&mut self, delta_time: f32) {
        self.rotation += self.rotation_rate * delta_time;
    }

    /// Radius of a sphere around `position` enclosing the mesh
    pub fn bounding_radius(&self) -> f32 {
        self.mesh.bounding_radius()
    }

    /// Color formatted as `#rrggbb`
    pub fn color_hex(&self) -> String {
        format!("#{:06x}", self.color & 0xFF_FFFF)
    }

    /// Human-readable attribute table
    ///
    /// `parent_name` is shown for planets and moons.
    pub fn detail_table(&self, parent_name: Option<&str>) -> DetailTable {
        let mut rows = vec![
            ("Name", self.name.clone()),
            ("Type", self.kind().name().to_string()),
            ("Size", format!("{:.2}", self.size)),
            ("Color", self.color_hex()),
            ("Density", format!("{:.2}", self.density)),
            ("Mass", format!("{:.2}", self.mass)),
            ("Pull radius", format!("{:.2}", self.pull_radius)),
        ];
        if let Some(orbit) = self.orbit() {
            rows.push(("Orbit radius", format!("{:.2}", orbit.semi_major_axis)));
            rows.push(("Orbital period", format!("{:.2}", orbit.orbital_period)));
        }
        if let (Some(parent), true) = (parent_name, self.kind().is_orbiting()) {
            rows.push(("Parent", parent.to_string()));
        }
        DetailTable { rows }
    }
}

/// `size³ * density`
#[inline]
pub fn mass_from(size: f32, density: f32) -> f32 {
    size * size * size * density
}

/// Cube root of mass
#[inline]
pub fn pull_radius_from(mass: f32) -> f32 {
    mass.cbrt()
}

/// Ordered label/value rows describing one body
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DetailTable {
    pub rows: Vec<(&'static str, String)>,
}

impl DetailTable {
    /// Value of the row with this label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for DetailTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            writeln!(f, "{:<width$}  {}", label, value, width = width)?;
        }
        Ok(())
    }
}
