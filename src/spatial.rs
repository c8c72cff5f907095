//! Spatial indexing for fast nearest-asteroid lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::body::BodyHandle;

/// KD-tree over asteroid positions
///
/// Asteroids never move after generation, so the tree is built once per
/// generation pass and queried read-only afterwards.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct AsteroidIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
    handles: Vec<BodyHandle>,
}

impl AsteroidIndex {
    /// Build the index from `(handle, position)` pairs
    ///
    /// Returns `None` when there is nothing to index.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_solar_system::*;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let entries = vec![
    ///     (BodyHandle(4), Vec3::new(10.0, 0.0, 0.0)),
    ///     (BodyHandle(9), Vec3::new(0.0, 10.0, 0.0)),
    /// ];
    ///
    /// let index = AsteroidIndex::new(&entries).unwrap();
    /// assert_eq!(index.find_nearest(Vec3::new(8.0, 1.0, 0.0)), BodyHandle(4));
    /// # }
    /// ```
    pub fn new(entries: &[(BodyHandle, Vec3)]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let points: Vec<[f32; 3]> = entries.iter().map(|(_, p)| p.to_array()).collect();
        let handles = entries.iter().map(|(h, _)| *h).collect();

        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            handles,
        })
    }

    /// Number of indexed asteroids
    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the index holds no asteroids
    ///
    /// [`AsteroidIndex::new`] never constructs an empty index.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handle of the asteroid closest to `position`
    pub fn find_nearest(&self, position: Vec3) -> BodyHandle {
        let query = position.to_array();
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        self.handles[result.item]
    }
}

impl std::fmt::Debug for AsteroidIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsteroidIndex")
            .field("len", &self.handles.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_maps_to_handles() {
        let entries = vec![
            (BodyHandle(10), Vec3::new(1.0, 0.0, 0.0)),
            (BodyHandle(11), Vec3::new(0.0, 1.0, 0.0)),
            (BodyHandle(12), Vec3::new(0.0, 0.0, 1.0)),
            (BodyHandle(13), Vec3::new(-1.0, 0.0, 0.0)),
        ];

        let index = AsteroidIndex::new(&entries).unwrap();
        assert_eq!(index.len(), 4);

        assert_eq!(index.find_nearest(Vec3::new(0.9, 0.1, 0.0)), BodyHandle(10));
        assert_eq!(index.find_nearest(Vec3::new(0.0, 0.95, 0.0)), BodyHandle(11));
        assert_eq!(index.find_nearest(Vec3::new(0.0, 0.1, 0.9)), BodyHandle(12));
        assert_eq!(index.find_nearest(Vec3::new(-0.8, 0.0, 0.0)), BodyHandle(13));
    }

    #[test]
    fn test_exact_match() {
        let entries = vec![
            (BodyHandle(0), Vec3::new(10.0, 0.0, 0.0)),
            (BodyHandle(1), Vec3::new(0.0, 10.0, 0.0)),
        ];
        let index = AsteroidIndex::new(&entries).unwrap();

        for (handle, position) in &entries {
            assert_eq!(index.find_nearest(*position), *handle);
        }
    }

    #[test]
    fn test_empty_index() {
        assert!(AsteroidIndex::new(&[]).is_none());
    }
}
