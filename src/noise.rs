//! 3D simplex noise
//!
//! Gradient noise evaluated over a skewed simplex grid. The permutation table
//! is shuffled from a [`RandomStream`] at construction and never changes
//! afterwards, so a [`NoiseField`] is a pure function of its position.

use glam::Vec3;

use crate::random::RandomStream;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of distinct entries in the permutation table
pub const TABLE_SIZE: usize = 256;

// ============================================================================
// SIMPLEX CONSTANTS
// ============================================================================

/// Skew factor: (sqrt(4) - 1) / 3
const F3: f32 = 1.0 / 3.0;
/// Unskew factor: (1 - 1/sqrt(4)) / 3
const G3: f32 = 1.0 / 6.0;
/// Brings the summed corner contributions to roughly [-1, 1]
const OUTPUT_SCALE: f32 = 72.0;

/// Gradients toward the 12 edge midpoints of a cube
const GRAD3: [[f32; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Seeded 3D gradient noise
///
/// Consumes `TABLE_SIZE - 1` uniform draws at construction (a Fisher-Yates
/// shuffle of `0..TABLE_SIZE`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    /// Shuffled table repeated twice so corner lookups never wrap
    perm: Vec<u8>,
}

impl NoiseField {
    /// Build a noise field whose permutation is shuffled from `rng`
    pub fn new(rng: &mut RandomStream) -> Self {
        let mut table: Vec<u8> = (0..TABLE_SIZE).map(|i| i as u8).collect();
        for i in (1..TABLE_SIZE).rev() {
            let j = rng.index(i + 1);
            table.swap(i, j);
        }

        let perm = (0..TABLE_SIZE * 2).map(|i| table[i & 255]).collect();
        Self { perm }
    }

    /// Sample noise at `(x, y, z)`
    ///
    /// # Returns
    /// Continuous value approximately in `[-1, 1]`
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        // Skew input space to find the containing simplex cell
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();

        // Unskew back to find the cell origin in input space
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Rank the offsets to pick which of the six tetrahedra we are in
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f32 + G3;
        let y1 = y0 - j1 as f32 + G3;
        let z1 = z0 - k1 as f32 + G3;
        let x2 = x0 - i2 as f32 + 2.0 * G3;
        let y2 = y0 - j2 as f32 + 2.0 * G3;
        let z2 = z0 - k2 as f32 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = (i as i32 & 255) as usize;
        let jj = (j as i32 & 255) as usize;
        let kk = (k as i32 & 255) as usize;

        let gi0 = self.gradient_index(ii, jj, kk);
        let gi1 = self.gradient_index(ii + i1, jj + j1, kk + k1);
        let gi2 = self.gradient_index(ii + i2, jj + j2, kk + k2);
        let gi3 = self.gradient_index(ii + 1, jj + 1, kk + 1);

        let n0 = corner(gi0, x0, y0, z0);
        let n1 = corner(gi1, x1, y1, z1);
        let n2 = corner(gi2, x2, y2, z2);
        let n3 = corner(gi3, x3, y3, z3);

        OUTPUT_SCALE * (n0 + n1 + n2 + n3)
    }

    /// Sample noise at a position vector
    #[inline]
    pub fn sample_at(&self, position: Vec3) -> f32 {
        self.sample(position.x, position.y, position.z)
    }

    /// Three-level table lookup selecting one of the 12 gradients
    #[inline]
    fn gradient_index(&self, i: usize, j: usize, k: usize) -> usize {
        let pk = self.perm[k] as usize;
        let pj = self.perm[j + pk] as usize;
        self.perm[i + pj] as usize % GRAD3.len()
    }
}

/// Radially attenuated contribution of one simplex corner
#[inline]
fn corner(gradient: usize, x: f32, y: f32, z: f32) -> f32 {
    let t = 0.5 - x * x - y * y - z * z;
    if t < 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    let g = GRAD3[gradient];
    t2 * t2 * (g[0] * x + g[1] * y + g[2] * z)
}
