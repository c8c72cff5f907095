//! Solar system configuration and builder
//!
//! This module provides configuration types for deterministic solar system
//! generation. The configuration (seed plus generation bounds) is the only state
//! worth persisting: everything else is regenerated from it.

use glam::Vec3;
use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::body::BodyKind;
use crate::error::{Result, SystemError};
use crate::mesh::{PolyhedronParams, MAX_DETAIL};
use crate::random::Seed;
use crate::system::Chunk;

/// Upper bound on orbital eccentricity for generated bodies
pub const MAX_ECCENTRICITY: f32 = 0.4;

/// Size and density ranges for one body kind
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProfile {
    /// Smallest size sampled
    pub size_min: f32,
    /// Largest size sampled (exclusive)
    pub size_max: f32,
    /// Smallest density sampled
    pub density_min: f32,
    /// Largest density sampled (exclusive)
    pub density_max: f32,
}

impl BodyProfile {
    /// Create a profile from `(min, max)` pairs
    pub const fn new(size: (f32, f32), density: (f32, f32)) -> Self {
        Self {
            size_min: size.0,
            size_max: size.1,
            density_min: density.0,
            density_max: density.1,
        }
    }

    /// Default profile for a body kind, in world units for a 512-unit chunk
    pub const fn default_for(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Star => Self::new((10.0, 20.0), (1.0, 1.4)),
            BodyKind::Planet => Self::new((2.0, 6.0), (3.0, 6.0)),
            BodyKind::Moon => Self::new((0.3, 1.2), (2.0, 4.0)),
            BodyKind::Asteroid => Self::new((0.5, 1.5), (1.5, 3.5)),
        }
    }

    fn validate(&self, kind: BodyKind) -> Result<()> {
        let ordered =
            |min: f32, max: f32| min.is_finite() && max.is_finite() && min > 0.0 && min <= max;
        if !ordered(self.size_min, self.size_max) || !ordered(self.density_min, self.density_max)
        {
            return Err(SystemError::InvalidConfig(format!(
                "{} profile needs positive, ordered ranges (got {:?})",
                kind, self
            )));
        }
        Ok(())
    }
}

/// Configuration for deterministic solar system generation
///
/// The same configuration will always produce the identical system.
///
/// # Example
///
/// ```rust
/// use rust_solar_system::*;
///
/// let config = SystemConfigBuilder::new()
///     .seed("61")
///     .chunk_size(512.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.chunk().half_size(), 256.0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Seed of the generation stream
    pub seed: Seed,
    /// Edge length of the cubic chunk holding the system
    pub chunk_size: f32,
    /// World-space center of the chunk
    pub chunk_offset: Vec3,
    /// Inclusive planet count range
    pub planet_count: (usize, usize),
    /// Inclusive moon count range, sampled per planet
    pub moon_count: (usize, usize),
    /// Inclusive asteroid count range
    pub asteroid_count: (usize, usize),
    /// Star size and density ranges
    pub star: BodyProfile,
    /// Planet size and density ranges
    pub planet: BodyProfile,
    /// Moon size and density ranges
    pub moon: BodyProfile,
    /// Asteroid size and density ranges
    pub asteroid: BodyProfile,
    /// Multiple of the star radius kept clear of planets
    pub star_margin: f32,
    /// Extra gap between the star margin and the closest planet surface
    pub planet_clearance: f32,
    /// Gap between a planet's surface and its moons' surfaces
    pub moon_clearance: f32,
    /// Moon orbit spread, as a multiple of the parent planet's size
    pub moon_orbit_spread: f32,
    /// Upper bound on planet eccentricity (at most [`MAX_ECCENTRICITY`])
    pub max_planet_eccentricity: f32,
    /// Upper bound on moon eccentricity (at most [`MAX_ECCENTRICITY`])
    pub max_moon_eccentricity: f32,
    /// Upper bound on planet orbit tilt (radians)
    pub max_planet_inclination: f32,
    /// Upper bound on moon orbit tilt (radians)
    pub max_moon_inclination: f32,
    /// `period = kepler_constant * a^(3/2)` for planets
    pub kepler_constant: f32,
    /// Moon base period is the parent's period divided by this
    pub moon_period_divisor: f32,
    /// Standard deviation of the relative moon period jitter
    pub moon_period_jitter: f32,
    /// Subdivision depth of star meshes (stars are never displaced)
    pub star_detail: u32,
    /// Planet mesh template (radius is replaced by the planet size)
    pub planet_mesh: PolyhedronParams,
    /// Moon mesh template (radius is replaced by the moon size)
    pub moon_mesh: PolyhedronParams,
    /// Full width of the spin rate range per axis (radians per second)
    pub max_spin: f32,
    /// Intensity of the star's point light
    pub star_light_intensity: f32,
    /// Multiplier applied to every simulation step
    pub time_scale: f32,
}

impl SystemConfig {
    /// The chunk described by `chunk_offset` and `chunk_size`
    #[inline]
    pub fn chunk(&self) -> Chunk {
        Chunk::new(self.chunk_offset, self.chunk_size)
    }

    /// Size and density ranges for a body kind
    pub fn profile(&self, kind: BodyKind) -> &BodyProfile {
        match kind {
            BodyKind::Star => &self.star,
            BodyKind::Planet => &self.planet,
            BodyKind::Moon => &self.moon,
            BodyKind::Asteroid => &self.asteroid,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            seed: Seed::Number(61),
            chunk_size: 512.0,
            chunk_offset: Vec3::ZERO,
            planet_count: (3, 7),
            moon_count: (0, 10),
            asteroid_count: (50, 99),
            star: BodyProfile::default_for(BodyKind::Star),
            planet: BodyProfile::default_for(BodyKind::Planet),
            moon: BodyProfile::default_for(BodyKind::Moon),
            asteroid: BodyProfile::default_for(BodyKind::Asteroid),
            star_margin: 1.5,
            planet_clearance: 8.0,
            moon_clearance: 0.5,
            moon_orbit_spread: 3.0,
            max_planet_eccentricity: MAX_ECCENTRICITY,
            max_moon_eccentricity: 0.2,
            max_planet_inclination: 0.15,
            max_moon_inclination: 0.35,
            kepler_constant: 0.1,
            moon_period_divisor: 8.0,
            moon_period_jitter: 0.1,
            star_detail: 2,
            planet_mesh: PolyhedronParams {
                detail: 4,
                roughness: 0.1,
                ..Default::default()
            },
            moon_mesh: PolyhedronParams {
                detail: 3,
                roughness: 0.15,
                ..Default::default()
            },
            max_spin: 1.2,
            star_light_intensity: 1_000_000.0,
            time_scale: 1.0,
        }
    }
}

/// Builder for creating SystemConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_solar_system::*;
///
/// let config = SystemConfigBuilder::new()
///     .seed(12345u64)
///     .planet_count(2, 4)
///     .unwrap()
///     .planet_detail(3)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.planet_mesh.detail, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SystemConfigBuilder {
    config: SystemConfig,
}

impl SystemConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: 61
    /// - chunk_size: 512, centered on the origin
    /// - planets: 3-7, moons: 0-10 per planet, asteroids: 50-99
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: SystemConfig) -> Self {
        Self { config }
    }

    /// Set the generation seed
    pub fn seed(mut self, seed: impl Into<Seed>) -> Self {
        self.config.seed = seed.into();
        self
    }

    /// Set the chunk edge length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size is not finite and positive
    pub fn chunk_size(mut self, size: f32) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(SystemError::InvalidConfig(format!(
                "chunk size must be positive (got {})",
                size
            )));
        }
        self.config.chunk_size = size;
        Ok(self)
    }

    /// Set the world-space center of the chunk
    pub fn chunk_offset(mut self, offset: Vec3) -> Self {
        self.config.chunk_offset = offset;
        self
    }

    /// Set the inclusive planet count range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if min > max
    pub fn planet_count(mut self, min: usize, max: usize) -> Result<Self> {
        self.config.planet_count = ordered_count("planet", min, max)?;
        Ok(self)
    }

    /// Set the inclusive per-planet moon count range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if min > max
    pub fn moon_count(mut self, min: usize, max: usize) -> Result<Self> {
        self.config.moon_count = ordered_count("moon", min, max)?;
        Ok(self)
    }

    /// Set the inclusive asteroid count range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if min > max
    pub fn asteroid_count(mut self, min: usize, max: usize) -> Result<Self> {
        self.config.asteroid_count = ordered_count("asteroid", min, max)?;
        Ok(self)
    }

    /// Override the size/density ranges of one body kind
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-positive or inverted ranges
    pub fn profile(mut self, kind: BodyKind, profile: BodyProfile) -> Result<Self> {
        profile.validate(kind)?;
        match kind {
            BodyKind::Star => self.config.star = profile,
            BodyKind::Planet => self.config.planet = profile,
            BodyKind::Moon => self.config.moon = profile,
            BodyKind::Asteroid => self.config.asteroid = profile,
        }
        Ok(self)
    }

    /// Set the star mesh subdivision depth, clamped to `0..=MAX_DETAIL`
    pub fn star_detail(mut self, detail: i32) -> Self {
        self.config.star_detail = clamp_detail("star", detail);
        self
    }

    /// Set the planet mesh subdivision depth, clamped to `0..=MAX_DETAIL`
    pub fn planet_detail(mut self, detail: i32) -> Self {
        self.config.planet_mesh.detail = clamp_detail("planet", detail);
        self
    }

    /// Set the moon mesh subdivision depth, clamped to `0..=MAX_DETAIL`
    pub fn moon_detail(mut self, detail: i32) -> Self {
        self.config.moon_mesh.detail = clamp_detail("moon", detail);
        self
    }

    /// Set the terrain roughness of planets and moons
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if roughness is negative
    pub fn roughness(mut self, planet: f32, moon: f32) -> Result<Self> {
        if !(planet >= 0.0 && moon >= 0.0) {
            return Err(SystemError::InvalidConfig(format!(
                "roughness must be >= 0 (got planet {}, moon {})",
                planet, moon
            )));
        }
        self.config.planet_mesh.roughness = planet;
        self.config.moon_mesh.roughness = moon;
        Ok(self)
    }

    /// Set the maximum planet eccentricity
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` outside `[0, MAX_ECCENTRICITY]`
    pub fn max_planet_eccentricity(mut self, e: f32) -> Result<Self> {
        self.config.max_planet_eccentricity = bounded_eccentricity(e)?;
        Ok(self)
    }

    /// Set the maximum moon eccentricity
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` outside `[0, MAX_ECCENTRICITY]`
    pub fn max_moon_eccentricity(mut self, e: f32) -> Result<Self> {
        self.config.max_moon_eccentricity = bounded_eccentricity(e)?;
        Ok(self)
    }

    /// Set the Kepler scaling constant for planet periods
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the constant is not positive
    pub fn kepler_constant(mut self, k: f32) -> Result<Self> {
        self.config.kepler_constant = positive("kepler constant", k)?;
        Ok(self)
    }

    /// Set how many times faster than its planet a moon orbits
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the divisor is below 1
    pub fn moon_period_divisor(mut self, divisor: f32) -> Result<Self> {
        if !(divisor >= 1.0 && divisor.is_finite()) {
            return Err(SystemError::InvalidConfig(format!(
                "moon period divisor must be >= 1 (got {})",
                divisor
            )));
        }
        self.config.moon_period_divisor = divisor;
        Ok(self)
    }

    /// Set the simulation time scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the scale is not positive
    pub fn time_scale(mut self, scale: f32) -> Result<Self> {
        self.config.time_scale = positive("time scale", scale)?;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<SystemConfig> {
        for kind in [BodyKind::Star, BodyKind::Planet, BodyKind::Moon, BodyKind::Asteroid] {
            self.config.profile(kind).validate(kind)?;
        }
        Ok(self.config)
    }
}

fn ordered_count(what: &str, min: usize, max: usize) -> Result<(usize, usize)> {
    if min > max {
        return Err(SystemError::InvalidConfig(format!(
            "{} count range is inverted ({} > {})",
            what, min, max
        )));
    }
    Ok((min, max))
}

fn bounded_eccentricity(e: f32) -> Result<f32> {
    if !(0.0..=MAX_ECCENTRICITY).contains(&e) {
        return Err(SystemError::InvalidConfig(format!(
            "eccentricity must be within [0, {}] (got {})",
            MAX_ECCENTRICITY, e
        )));
    }
    Ok(e)
}

fn positive(what: &str, value: f32) -> Result<f32> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(SystemError::InvalidConfig(format!(
            "{} must be positive (got {})",
            what, value
        )));
    }
    Ok(value)
}

fn clamp_detail(what: &str, detail: i32) -> u32 {
    let clamped = detail.clamp(0, MAX_DETAIL as i32) as u32;
    if clamped as i32 != detail {
        warn!("[Config] {} detail {} clamped to {}", what, detail, clamped);
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SystemConfig::default();
        assert_eq!(config.seed, Seed::Number(61));
        assert_eq!(config.chunk_size, 512.0);
        assert_eq!(config.planet_count, (3, 7));
        assert_eq!(config.moon_count, (0, 10));
        assert_eq!(config.asteroid_count, (50, 99));
        assert_eq!(config.planet_mesh.threshold_fraction, 0.5);
        assert!(config.max_planet_eccentricity <= MAX_ECCENTRICITY);
        assert_eq!(SystemConfigBuilder::new().build().unwrap(), config);
    }

    #[test]
    fn test_builder_custom() {
        let config = SystemConfigBuilder::new()
            .seed("andromeda")
            .chunk_size(1024.0)
            .unwrap()
            .chunk_offset(Vec3::new(1024.0, 0.0, 0.0))
            .planet_count(1, 2)
            .unwrap()
            .moon_count(0, 0)
            .unwrap()
            .asteroid_count(5, 5)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, Seed::Text("andromeda".to_string()));
        assert_eq!(config.chunk().size, 1024.0);
        assert_eq!(config.chunk().offset, Vec3::new(1024.0, 0.0, 0.0));
        assert_eq!(config.planet_count, (1, 2));
        assert_eq!(config.asteroid_count, (5, 5));
    }

    #[test]
    fn test_invalid_chunk_size() {
        assert!(SystemConfigBuilder::new().chunk_size(0.0).is_err());
        assert!(SystemConfigBuilder::new().chunk_size(-10.0).is_err());
        assert!(SystemConfigBuilder::new().chunk_size(f32::NAN).is_err());
    }

    #[test]
    fn test_inverted_counts() {
        assert!(SystemConfigBuilder::new().planet_count(5, 2).is_err());
        assert!(SystemConfigBuilder::new().moon_count(3, 1).is_err());
        assert!(SystemConfigBuilder::new().asteroid_count(10, 9).is_err());
    }

    #[test]
    fn test_detail_clamped() {
        let config = SystemConfigBuilder::new()
            .planet_detail(-3)
            .moon_detail(99)
            .star_detail(1)
            .build()
            .unwrap();
        assert_eq!(config.planet_mesh.detail, 0);
        assert_eq!(config.moon_mesh.detail, MAX_DETAIL);
        assert_eq!(config.star_detail, 1);
    }

    #[test]
    fn test_eccentricity_bounds() {
        assert!(SystemConfigBuilder::new().max_planet_eccentricity(0.5).is_err());
        assert!(SystemConfigBuilder::new().max_moon_eccentricity(-0.1).is_err());
        assert!(SystemConfigBuilder::new().max_planet_eccentricity(0.4).is_ok());
    }

    #[test]
    fn test_invalid_profile() {
        let inverted = BodyProfile::new((5.0, 1.0), (1.0, 2.0));
        assert!(SystemConfigBuilder::new().profile(BodyKind::Planet, inverted).is_err());

        let zero = BodyProfile::new((0.0, 1.0), (1.0, 2.0));
        assert!(SystemConfigBuilder::new().profile(BodyKind::Moon, zero).is_err());

        let fine = BodyProfile::new((1.0, 1.0), (1.0, 2.0));
        let config = SystemConfigBuilder::new()
            .profile(BodyKind::Asteroid, fine)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.profile(BodyKind::Asteroid), &fine);
    }

    #[test]
    fn test_positive_parameters() {
        assert!(SystemConfigBuilder::new().kepler_constant(0.0).is_err());
        assert!(SystemConfigBuilder::new().time_scale(-1.0).is_err());
        assert!(SystemConfigBuilder::new().moon_period_divisor(0.5).is_err());
        assert!(SystemConfigBuilder::new().roughness(-0.1, 0.0).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = SystemConfigBuilder::new().seed(12345u64).build().unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: SystemConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
