//! Goldberg-like polyhedron synthesis
//!
//! Subdivides a regular icosahedron, projects every vertex onto the unit sphere,
//! then pushes vertices in or out where the noise field crosses a threshold.
//! The thresholding yields plateaus and ridges rather than uniform jitter.

use glam::Vec3;
use log::debug;
use std::collections::HashMap;

use super::MeshGeometry;
use crate::noise::NoiseField;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest subdivision depth accepted (20 * 4^7 = 327,680 triangles)
pub const MAX_DETAIL: u32 = 7;

/// Vertices are interned on coordinates rounded to this many decimal digits
const KEY_SCALE: f32 = 1e5;

/// Golden ratio φ = (1 + √5) / 2
const PHI: f32 = 1.618_034;

/// Icosahedron corners before normalization
const BASE_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

/// Icosahedron faces, wound counter-clockwise seen from outside
const BASE_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Parameters for [`build_polyhedron`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyhedronParams {
    /// Radius of the undisplaced sphere
    pub radius: f32,
    /// Subdivision depth; triangle count is `20 * 4^detail`
    pub detail: u32,
    /// Scale of the radial displacement (0 gives a perfect sphere)
    pub roughness: f32,
    /// Constant step added once the noise crosses the threshold
    pub step_size: f32,
    /// Exponent shaping the noise magnitude (1 keeps it linear)
    pub noise_power: f32,
    /// Noise magnitude above which a vertex is raised or lowered
    pub threshold_fraction: f32,
}

impl Default for PolyhedronParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            detail: 1,
            roughness: 0.1,
            step_size: 0.1,
            noise_power: 1.0,
            threshold_fraction: 0.5,
        }
    }
}

impl PolyhedronParams {
    /// Same parameters with a different radius
    pub fn with_radius(self, radius: f32) -> Self {
        Self { radius, ..self }
    }

    /// Expected vertex count: `10 * 4^detail + 2`
    pub fn vertex_count(&self) -> usize {
        10 * 4usize.pow(self.detail.min(MAX_DETAIL)) + 2
    }

    /// Expected triangle count: `20 * 4^detail`
    pub fn triangle_count(&self) -> usize {
        20 * 4usize.pow(self.detail.min(MAX_DETAIL))
    }

    /// Relative radial offset for a noise sample
    ///
    /// Inside `[-threshold, threshold]` the surface stays at the base radius.
    /// Beyond it, the shaped noise plus a constant step (signed like the noise)
    /// is scaled by roughness.
    pub fn radial_offset(&self, noise: f32) -> f32 {
        if noise.abs() <= self.threshold_fraction {
            return 0.0;
        }
        let shaped = noise.signum() * noise.abs().powf(self.noise_power);
        (self.step_size * noise.signum() + shaped) * self.roughness
    }
}

/// Deduplicates vertices by quantized coordinates
struct VertexInterner {
    lookup: HashMap<[i64; 3], u32>,
    positions: Vec<Vec3>,
}

impl VertexInterner {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
        }
    }

    fn intern(&mut self, v: Vec3) -> u32 {
        let key = [quantize(v.x), quantize(v.y), quantize(v.z)];
        let positions = &mut self.positions;
        *self.lookup.entry(key).or_insert_with(|| {
            positions.push(v);
            (positions.len() - 1) as u32
        })
    }
}

#[inline]
fn quantize(c: f32) -> i64 {
    (c * KEY_SCALE).round() as i64
}

/// Build a noise-displaced subdivided icosahedron
///
/// # Algorithm
///
/// 1. Normalize the 12 icosahedron corners onto the unit sphere
/// 2. Split every face into four `detail` times, projecting edge midpoints
///    back onto the sphere (explicit work stack, no recursion)
/// 3. Intern emitted corners so shared edges store each vertex once
/// 4. Displace each vertex along its radius by [`PolyhedronParams::radial_offset`]
///    of the noise sampled at its unit-sphere position
/// 5. Scale to `radius * (1 + offset)` and derive area-weighted normals
///
/// `detail` above [`MAX_DETAIL`] is clamped.
pub fn build_polyhedron(params: &PolyhedronParams, noise: &NoiseField) -> MeshGeometry {
    let detail = params.detail.min(MAX_DETAIL);
    let base: Vec<Vec3> = BASE_VERTICES
        .iter()
        .map(|v| Vec3::from_array(*v).normalize())
        .collect();

    let expected_vertices = params.vertex_count();
    let mut interner = VertexInterner::with_capacity(expected_vertices);
    let mut triangles: Vec<[u32; 3]> = Vec::with_capacity(params.triangle_count());

    // Faces are pushed in reverse so they pop in declaration order
    let mut stack: Vec<(Vec3, Vec3, Vec3, u32)> = BASE_FACES
        .iter()
        .rev()
        .map(|&[a, b, c]| (base[a], base[b], base[c], detail))
        .collect();

    while let Some((v1, v2, v3, depth)) = stack.pop() {
        if depth == 0 {
            triangles.push([interner.intern(v1), interner.intern(v2), interner.intern(v3)]);
            continue;
        }

        let v12 = ((v1 + v2) * 0.5).normalize();
        let v23 = ((v2 + v3) * 0.5).normalize();
        let v31 = ((v3 + v1) * 0.5).normalize();

        // Children keep the parent's winding
        stack.push((v12, v23, v31, depth - 1));
        stack.push((v3, v31, v23, depth - 1));
        stack.push((v2, v23, v12, depth - 1));
        stack.push((v1, v12, v31, depth - 1));
    }

    let positions: Vec<Vec3> = interner
        .positions
        .into_iter()
        .map(|unit| {
            let offset = params.radial_offset(noise.sample_at(unit));
            unit * (params.radius * (1.0 + offset))
        })
        .collect();

    debug!(
        "[Polyhedron] detail={} radius={:.3} -> {} vertices, {} triangles",
        detail,
        params.radius,
        positions.len(),
        triangles.len()
    );

    MeshGeometry::from_parts(positions, triangles)
}
