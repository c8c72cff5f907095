//! Celestial body factory
//!
//! Turns draws from a [`RandomStream`] into fully formed bodies. The order in
//! which attributes are sampled is fixed, since every later body depends on how
//! many draws the earlier ones consumed:
//!
//! 1. name (see [`generate_name`])
//! 2. size
//! 3. color
//! 4. density
//! 5. spin rate x, y, z
//! 6. kind-specific draws:
//!    - Star: noise table (255 draws)
//!    - Planet / Moon: eccentricity, inclination, start angle, semi-major axis,
//!      moon period jitter (two draws, moons only), noise table (255 draws)
//!    - Asteroid: position x, y, z

use glam::Vec3;
use log::warn;
use std::f32::consts::TAU;

use crate::body::{
    mass_from, pull_radius_from, BodyDetails, BodyHandle, BodyKind, CelestialBody, PointLight,
};
use crate::config::SystemConfig;
use crate::mesh::{build_box, build_polyhedron, MeshGeometry, PolyhedronParams};
use crate::naming::generate_name;
use crate::noise::NoiseField;
use crate::orbit::OrbitState;
use crate::random::RandomStream;
use crate::system::Chunk;

/// Shortest orbital period handed out (seconds)
pub const MIN_PERIOD: f32 = 0.5;

/// Star surface colors, from hot blue-white to cool orange
const STAR_COLORS: [u32; 6] = [0xcad7ff, 0xf8f7ff, 0xfff4e8, 0xffe9a1, 0xffd27f, 0xffb347];

/// Light falloff exponent for star lights (inverse square)
const STAR_LIGHT_DECAY: f32 = 2.0;

/// The body an orbiting body revolves around
#[derive(Debug, Clone, Copy)]
pub struct ParentRef<'a> {
    /// Handle of the parent in the body list
    pub handle: BodyHandle,
    /// The parent itself
    pub body: &'a CelestialBody,
}

/// Creates bodies inside one chunk from a shared configuration
///
/// The factory is stateless; all randomness comes from the stream passed to
/// [`BodyFactory::create_body`].
#[derive(Debug, Clone, Copy)]
pub struct BodyFactory<'a> {
    config: &'a SystemConfig,
    chunk: Chunk,
}

/// Attributes shared by every kind, sampled before the kind-specific ones
struct CommonAttributes {
    name: String,
    size: f32,
    color: u32,
    density: f32,
    rotation_rate: Vec3,
}

impl<'a> BodyFactory<'a> {
    /// Create a factory placing bodies in `chunk`
    pub fn new(config: &'a SystemConfig, chunk: Chunk) -> Self {
        Self { config, chunk }
    }

    /// The chunk bodies are placed in
    pub fn chunk(&self) -> Chunk {
        self.chunk
    }

    /// Create one body of `kind`
    ///
    /// Planets need the star as `parent`, moons their planet. Returns `None`
    /// when the parent is missing or has the wrong kind, or when no orbit fits
    /// between the clearance around the parent and the chunk boundary. Such
    /// bodies are skipped rather than squeezed into an invalid orbit.
    pub fn create_body(
        &self,
        kind: BodyKind,
        rng: &mut RandomStream,
        parent: Option<ParentRef<'_>>,
    ) -> Option<CelestialBody> {
        let expected_parent = match kind {
            BodyKind::Planet => Some(BodyKind::Star),
            BodyKind::Moon => Some(BodyKind::Planet),
            BodyKind::Star | BodyKind::Asteroid => None,
        };
        if let Some(expected) = expected_parent {
            match parent {
                Some(p) if p.body.kind() == expected => {}
                _ => {
                    warn!("[Factory] {} needs a {} parent, skipping", kind, expected);
                    return None;
                }
            }
        }

        let common = self.sample_common(kind, rng);
        match kind {
            BodyKind::Star => Some(self.finish_star(common, rng)),
            BodyKind::Planet => self.finish_planet(common, rng, parent?),
            BodyKind::Moon => self.finish_moon(common, rng, parent?),
            BodyKind::Asteroid => Some(self.finish_asteroid(common, rng)),
        }
    }

    fn sample_common(&self, kind: BodyKind, rng: &mut RandomStream) -> CommonAttributes {
        let profile = self.config.profile(kind);

        let name = generate_name(rng);
        let size = rng.range(profile.size_min, profile.size_max);
        let color = match kind {
            BodyKind::Star => STAR_COLORS[rng.index(STAR_COLORS.len())],
            _ => (rng.next_uniform() * f64::from(0xFF_FFFF_u32)) as u32,
        };
        let density = rng.range(profile.density_min, profile.density_max);

        let half_spin = self.config.max_spin * 0.5;
        let rotation_rate = Vec3::new(
            rng.signed(half_spin),
            rng.signed(half_spin),
            rng.signed(half_spin),
        );

        CommonAttributes {
            name,
            size,
            color,
            density,
            rotation_rate,
        }
    }

    fn finish_star(&self, common: CommonAttributes, rng: &mut RandomStream) -> CelestialBody {
        let params = PolyhedronParams {
            radius: common.size,
            detail: self.config.star_detail,
            roughness: 0.0,
            ..Default::default()
        };
        let mesh = polyhedron_mesh(&params, rng);
        let light = PointLight {
            color: common.color,
            intensity: self.config.star_light_intensity,
            decay: STAR_LIGHT_DECAY,
        };

        assemble(common, mesh, self.chunk.offset, BodyDetails::Star { light })
    }

    fn finish_planet(
        &self,
        common: CommonAttributes,
        rng: &mut RandomStream,
        star: ParentRef<'_>,
    ) -> Option<CelestialBody> {
        let config = self.config;
        let eccentricity = rng.range(0.0, config.max_planet_eccentricity);
        let inclination = rng.signed(config.max_planet_inclination);
        let angle = rng.range(0.0, TAU);

        // The ellipse is centred on the star, so its closest approach is b
        let clearance = star.body.size * config.star_margin + common.size + config.planet_clearance;
        let min_axis = clearance / (1.0 - eccentricity * eccentricity).sqrt();
        let max_axis = self.chunk.half_size() - common.size;
        if !(max_axis >= min_axis) {
            warn!(
                "[Factory] no planet orbit fits between {:.2} and {:.2}, skipping {}",
                min_axis, max_axis, common.name
            );
            return None;
        }
        let semi_major_axis = rng.range(min_axis, max_axis).clamp(min_axis, max_axis);
        let orbital_period = (config.kepler_constant * semi_major_axis.powf(1.5)).max(MIN_PERIOD);

        let orbit = OrbitState {
            semi_major_axis,
            eccentricity,
            orbital_period,
            angle,
            inclination,
            parent: star.handle,
        };
        let mesh = polyhedron_mesh(&config.planet_mesh.with_radius(common.size), rng);
        let position = orbit.position(star.body.position);

        Some(assemble(common, mesh, position, BodyDetails::Planet { orbit }))
    }

    fn finish_moon(
        &self,
        common: CommonAttributes,
        rng: &mut RandomStream,
        planet: ParentRef<'_>,
    ) -> Option<CelestialBody> {
        let config = self.config;
        let parent_orbit = planet.body.orbit()?;

        let eccentricity = rng.range(0.0, config.max_moon_eccentricity);
        let inclination = rng.signed(config.max_moon_inclination);
        let angle = rng.range(0.0, TAU);

        let clearance = planet.body.size + common.size + config.moon_clearance;
        let min_axis = clearance / (1.0 - eccentricity * eccentricity).sqrt();
        // Keep the moon inside the chunk at the planet's farthest point
        let room = self.chunk.half_size() - parent_orbit.semi_major_axis - common.size;
        let max_axis = (min_axis + planet.body.size * config.moon_orbit_spread).min(room);
        // f32::min ignores a NaN room
        if !(max_axis >= min_axis && room >= min_axis) {
            warn!(
                "[Factory] no orbit around {} fits {}, skipping",
                planet.body.name, common.name
            );
            return None;
        }
        let semi_major_axis = rng.range(min_axis, max_axis).clamp(min_axis, max_axis);

        let jitter = rng
            .next_normal(0.0, f64::from(config.moon_period_jitter))
            .clamp(-0.5, 0.5) as f32;
        let base_period = parent_orbit.orbital_period / config.moon_period_divisor;
        let orbital_period = (base_period * (1.0 + jitter)).max(MIN_PERIOD);

        let orbit = OrbitState {
            semi_major_axis,
            eccentricity,
            orbital_period,
            angle,
            inclination,
            parent: planet.handle,
        };
        let mesh = polyhedron_mesh(&config.moon_mesh.with_radius(common.size), rng);
        let position = orbit.position(planet.body.position);

        Some(assemble(common, mesh, position, BodyDetails::Moon { orbit }))
    }

    fn finish_asteroid(&self, common: CommonAttributes, rng: &mut RandomStream) -> CelestialBody {
        let half = self.chunk.half_size();
        let position = self.chunk.offset
            + Vec3::new(rng.signed(half), rng.signed(half), rng.signed(half));
        let mesh = build_box(common.size);

        assemble(common, mesh, position, BodyDetails::Asteroid)
    }
}

/// Draw a fresh noise table and build the displaced polyhedron
fn polyhedron_mesh(params: &PolyhedronParams, rng: &mut RandomStream) -> MeshGeometry {
    let noise = NoiseField::new(rng);
    build_polyhedron(params, &noise)
}

fn assemble(
    common: CommonAttributes,
    mesh: MeshGeometry,
    position: Vec3,
    details: BodyDetails,
) -> CelestialBody {
    let mass = mass_from(common.size, common.density);
    CelestialBody {
        name: common.name,
        size: common.size,
        color: common.color,
        density: common.density,
        mass,
        pull_radius: pull_radius_from(mass),
        mesh,
        rotation: Vec3::ZERO,
        rotation_rate: common.rotation_rate,
        position,
        details,
    }
}
