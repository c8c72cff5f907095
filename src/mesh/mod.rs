//! Mesh geometry for celestial bodies
//!
//! Produces engine-agnostic indexed triangle meshes. Non-trivial bodies get a
//! noise-displaced subdivided icosahedron ([`build_polyhedron`]); asteroids use a
//! plain box ([`build_box`]).

mod polyhedron;
mod primitives;

pub use polyhedron::{build_polyhedron, PolyhedronParams, MAX_DETAIL};
pub use primitives::build_box;

use glam::Vec3;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine-agnostic indexed triangle mesh
///
/// Contains raw vertex data suitable for any rendering or physics backend:
/// - Renderers: upload `positions`/`normals` as vertex buffers and
///   [`MeshGeometry::flat_indices`] as the index buffer
/// - Physics: build a trimesh or convex collider from `positions`/`triangles`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    /// Vertex positions, relative to the body's center
    pub positions: Vec<[f32; 3]>,
    /// Area-weighted vertex normals (shading metadata)
    pub normals: Vec<[f32; 3]>,
    /// Triangles as counter-clockwise (outward facing) vertex index triples
    pub triangles: Vec<[u32; 3]>,
}

impl MeshGeometry {
    /// Assemble a mesh and derive its vertex normals
    pub fn from_parts(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let normals = compute_vertex_normals(&positions, &triangles);
        Self {
            positions: positions.iter().map(|p| p.to_array()).collect(),
            normals: normals.iter().map(|n| n.to_array()).collect(),
            triangles,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex position as a vector
    #[inline]
    pub fn vertex(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.positions[index])
    }

    /// Triangle indices flattened for index buffers
    pub fn flat_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Distance from the mesh origin to its farthest vertex
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| Vec3::from_array(*p).length())
            .fold(0.0, f32::max)
    }

    /// Count how many triangles use each undirected edge
    pub fn edge_usage(&self) -> HashMap<(u32, u32), usize> {
        let mut usage = HashMap::with_capacity(self.triangles.len() * 3 / 2);
        for tri in &self.triangles {
            for e in 0..3 {
                let a = tri[e];
                let b = tri[(e + 1) % 3];
                *usage.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        usage
    }

    /// Whether every index is in bounds and every edge borders exactly two triangles
    pub fn is_closed(&self) -> bool {
        let count = self.positions.len() as u32;
        let in_bounds = self
            .triangles
            .iter()
            .all(|tri| tri.iter().all(|&i| i < count));

        in_bounds && !self.triangles.is_empty() && self.edge_usage().values().all(|&n| n == 2)
    }
}

/// Area-weighted average of adjacent face normals
///
/// The unnormalized cross product of a triangle's edges has length twice its
/// area, so summing raw cross products weights each face by its area.
pub(crate) fn compute_vertex_normals(positions: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in triangles {
        let [a, b, c] = tri.map(|i| i as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .zip(positions)
        .map(|(n, p)| {
            // Isolated vertices fall back to the radial direction
            n.try_normalize()
                .or_else(|| p.try_normalize())
                .unwrap_or(Vec3::Y)
        })
        .collect()
}
