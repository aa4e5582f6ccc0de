//! Spatial point index for collision queries.
//!
//! Wraps a KD-tree in a small owned type that answers "which tags were
//! inserted within radius r of this point". The index is rebuilt from
//! scratch every update step, since vertex positions change each step.
//!
//! Queries return an explicit collection of tags rather than invoking a
//! per-match callback; no tag is ever reported twice.

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;

/// A mutable set of (position, tag) pairs supporting sphere range queries.
#[derive(Debug)]
pub struct PointIndex {
    tree: KdTree<f64, 3>,
}

impl Default for PointIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PointIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { tree: KdTree::new() }
    }

    /// Create an empty index sized for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: KdTree::with_capacity(capacity),
        }
    }

    /// Number of inserted points.
    pub fn len(&self) -> usize {
        self.tree.size() as usize
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a point with an integer tag.
    pub fn insert(&mut self, position: &Point3<f64>, tag: usize) {
        let coords = [position.x, position.y, position.z];
        self.tree.add(&coords, tag as u64);
    }

    /// All tags whose inserted position lies within `radius` of `center`.
    ///
    /// Each qualifying tag is reported exactly once, in no particular
    /// order. Query cost is sub-linear in the number of inserted points for
    /// well-distributed input.
    pub fn within(&self, center: &Point3<f64>, radius: f64) -> Vec<usize> {
        let query = [center.x, center.y, center.z];
        self.tree
            .within_unsorted::<SquaredEuclidean>(&query, radius * radius)
            .into_iter()
            .map(|n| n.item as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index() {
        let index = PointIndex::new();
        assert!(index.is_empty());
        assert!(index.within(&Point3::origin(), 10.0).is_empty());
    }

    #[test]
    fn test_within_radius() {
        let mut index = PointIndex::new();
        index.insert(&Point3::new(0.0, 0.0, 0.0), 0);
        index.insert(&Point3::new(0.5, 0.0, 0.0), 1);
        index.insert(&Point3::new(0.0, 0.9, 0.0), 2);
        index.insert(&Point3::new(3.0, 0.0, 0.0), 3);

        let mut hits = index.within(&Point3::origin(), 1.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1, 2]);
    }

    #[test]
    fn test_no_duplicate_tags() {
        let mut index = PointIndex::with_capacity(8);
        for i in 0..8 {
            index.insert(&Point3::new(i as f64 * 0.1, 0.0, 0.0), i);
        }

        let mut hits = index.within(&Point3::origin(), 2.0);
        let before = hits.len();
        hits.sort_unstable();
        hits.dedup();
        assert_eq!(hits.len(), before);
        assert_eq!(hits.len(), 8);
    }

    #[test]
    fn test_excludes_points_outside_sphere() {
        let mut index = PointIndex::new();
        index.insert(&Point3::new(1.0, 0.0, 0.0), 0);
        index.insert(&Point3::new(1.1, 0.0, 0.0), 1);

        let hits = index.within(&Point3::origin(), 1.05);
        assert_eq!(hits, vec![0]);
    }
}
