//! Per-vertex force accumulation.
//!
//! Every constraint pass votes on vertex displacements by adding a weighted
//! move and its weight here; the final position update applies the weighted
//! average of all votes per vertex. Passes only ever read the mesh and
//! write the accumulator, so all passes see the same pre-step snapshot of
//! vertex positions regardless of execution order.

use nalgebra::Vector3;

use crate::mesh::{HalfEdgeMesh, VertexId};

/// Weighted-displacement and weight-sum buffers, one slot per vertex.
///
/// Reallocated and zeroed at the start of every update step, after any
/// growth has settled the vertex count.
#[derive(Debug, Clone)]
pub struct ForceAccumulator {
    moves: Vec<Vector3<f64>>,
    weights: Vec<f64>,
}

impl ForceAccumulator {
    /// Create a zeroed accumulator for `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            moves: vec![Vector3::zeros(); vertex_count],
            weights: vec![0.0; vertex_count],
        }
    }

    /// Number of vertex slots.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the accumulator has no slots.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Add one constraint vote: `weight * displacement` and `weight`.
    #[inline]
    pub fn add(&mut self, v: VertexId, weight: f64, displacement: Vector3<f64>) {
        self.moves[v.index()] += weight * displacement;
        self.weights[v.index()] += weight;
    }

    /// Total accumulated weight for a vertex.
    #[inline]
    pub fn weight(&self, v: VertexId) -> f64 {
        self.weights[v.index()]
    }

    /// Element-wise sum of two accumulators of equal size.
    ///
    /// Used to reduce per-thread partial accumulators from a parallel pass.
    pub fn merge(mut self, other: ForceAccumulator) -> ForceAccumulator {
        debug_assert_eq!(self.len(), other.len());
        for (m, o) in self.moves.iter_mut().zip(other.moves.iter()) {
            *m += o;
        }
        for (w, o) in self.weights.iter_mut().zip(other.weights.iter()) {
            *w += o;
        }
        self
    }

    /// Apply the weighted-average displacement to every voted-on vertex.
    ///
    /// Vertices with zero total weight are left unmoved.
    pub fn apply_to(&self, mesh: &mut HalfEdgeMesh) {
        debug_assert_eq!(self.len(), mesh.num_vertices());
        for (i, (&w, mv)) in self.weights.iter().zip(self.moves.iter()).enumerate() {
            if w == 0.0 {
                continue;
            }
            let v = VertexId::new(i);
            let pos = *mesh.position(v);
            mesh.set_position(v, pos + mv / w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    #[test]
    fn test_weight_additivity() {
        let mut acc = ForceAccumulator::new(3);
        let v = VertexId::new(1);

        acc.add(v, 0.5, Vector3::new(1.0, 0.0, 0.0));
        acc.add(v, 2.0, Vector3::new(0.0, 1.0, 0.0));
        acc.add(v, 0.25, Vector3::new(0.0, 0.0, 1.0));

        assert!((acc.weight(v) - 2.75).abs() < 1e-12);
        assert_eq!(acc.weight(VertexId::new(0)), 0.0);
    }

    #[test]
    fn test_merge_sums_elementwise() {
        let mut a = ForceAccumulator::new(2);
        let mut b = ForceAccumulator::new(2);
        a.add(VertexId::new(0), 1.0, Vector3::new(1.0, 0.0, 0.0));
        b.add(VertexId::new(0), 1.0, Vector3::new(0.0, 1.0, 0.0));
        b.add(VertexId::new(1), 3.0, Vector3::new(0.0, 0.0, 1.0));

        let merged = a.merge(b);
        assert!((merged.weight(VertexId::new(0)) - 2.0).abs() < 1e-12);
        assert!((merged.weight(VertexId::new(1)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_weighted_average() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();

        let mut acc = ForceAccumulator::new(3);
        // Two votes on vertex 0: average of (1,0,0) and (0,1,0) with equal
        // weight is (0.5, 0.5, 0).
        acc.add(VertexId::new(0), 1.0, Vector3::new(1.0, 0.0, 0.0));
        acc.add(VertexId::new(0), 1.0, Vector3::new(0.0, 1.0, 0.0));
        acc.apply_to(&mut mesh);

        let moved = mesh.position(VertexId::new(0));
        assert!((moved - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);

        // Untouched vertices keep their positions exactly.
        assert_eq!(*mesh.position(VertexId::new(1)), vertices[1]);
        assert_eq!(*mesh.position(VertexId::new(2)), vertices[2]);
    }

    #[test]
    fn test_unequal_weights_bias_the_average() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();

        let v = VertexId::new(0);
        let mut acc = ForceAccumulator::new(mesh.num_vertices());
        acc.add(v, 3.0, Vector3::new(1.0, 0.0, 0.0));
        acc.add(v, 1.0, Vector3::new(-1.0, 0.0, 0.0));
        acc.apply_to(&mut mesh);

        // (3*1 + 1*(-1)) / 4 = 0.5
        assert!((mesh.position(v).x - 0.5).abs() < 1e-12);
    }
}
