//! Simple closed primitives

use glam::Vec3;

use super::MeshGeometry;

/// Corner `i` sits at `(±h, ±h, ±h)` with bit 0 -> x, bit 1 -> y, bit 2 -> z
const BOX_FACES: [[u32; 3]; 12] = [
    // -x
    [0, 4, 6],
    [0, 6, 2],
    // +x
    [1, 3, 7],
    [1, 7, 5],
    // -y
    [0, 1, 5],
    [0, 5, 4],
    // +y
    [2, 6, 7],
    [2, 7, 3],
    // -z
    [0, 2, 3],
    [0, 3, 1],
    // +z
    [4, 5, 7],
    [4, 7, 6],
];

/// Axis-aligned cube with edge length `size`, centered on the origin
///
/// The eight corners are shared between faces so the mesh is closed.
pub fn build_box(size: f32) -> MeshGeometry {
    let h = size * 0.5;
    let positions: Vec<Vec3> = (0..8u32)
        .map(|i| {
            let pick = |bit: u32| if (i & bit) == 0 { -h } else { h };
            Vec3::new(pick(1), pick(2), pick(4))
        })
        .collect();

    MeshGeometry::from_parts(positions, BOX_FACES.to_vec())
}
