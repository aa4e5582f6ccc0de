//! Mesh growth by subdivision and collision-aware relaxation.
//!
//! [`GrowthSystem`] owns a half-edge mesh and advances it in discrete
//! steps. Each step runs, in strict order:
//!
//! 1. **Growth** (optional): split every edge longer than
//!    `0.99 × collision_distance` at its midpoint, while the vertex count
//!    stays below the configured maximum.
//! 2. **Collision**: repel every vertex pair closer than
//!    `collision_distance`, either brute-force over all pairs or through a
//!    spatial index.
//! 3. **Bending resistance**: pull the four vertices of the two triangles
//!    sharing each interior edge toward their common best-fit plane.
//! 4. **Edge-length constraint**: spring overstretched edges back toward
//!    `collision_distance`.
//! 5. **Position update**: move each vertex by the weighted average of all
//!    constraint votes collected above.
//!
//! Constraint passes never read each other's votes; every pass sees the
//! vertex positions as they were at the start of the step.
//!
//! # Example
//!
//! ```
//! use burgeon::algo::{GrowthOptions, GrowthSystem};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//!
//! let options = GrowthOptions::default()
//!     .with_grow(true)
//!     .with_max_vertex_count(100)
//!     .with_collision_distance(0.4);
//! let mut system = GrowthSystem::new(&vertices, &faces, options).unwrap();
//!
//! system.run(5);
//! assert!(system.mesh().num_vertices() <= 100);
//! ```

use nalgebra::Point3;
use rayon::prelude::*;

use super::accumulate::ForceAccumulator;
use crate::error::{GrowthError, Result};
use crate::mesh::{build_from_triangles, HalfEdgeId, HalfEdgeMesh, VertexId};
use crate::spatial::PointIndex;

/// Shaping constant of the collision response.
///
/// Scales how far a colliding pair is nudged apart per step; 0.5 pushes
/// clusters out into spheres. Both the brute-force and the indexed
/// collision path use this same value, so the two paths agree.
const COLLISION_RESPONSE: f64 = 0.5;

/// Edges longer than this fraction of the collision distance are split
/// during a growth pass.
const SPLIT_THRESHOLD: f64 = 0.99;

/// Lengths below this are treated as degenerate: the element contributes
/// nothing rather than dividing by (nearly) zero.
const LENGTH_EPSILON: f64 = 1e-10;

/// Configuration for a [`GrowthSystem`].
///
/// Supplied before each step batch; may change between batches.
#[derive(Debug, Clone)]
pub struct GrowthOptions {
    /// Whether the growth pass runs (edge subdivision).
    pub grow: bool,

    /// Vertex-count ceiling for growth. Splits that would exceed it are
    /// silently suppressed.
    pub max_vertex_count: usize,

    /// Weight of the edge-length constraint relative to the other passes.
    pub edge_length_weight: f64,

    /// Collision sphere diameter: vertex pairs closer than this repel, and
    /// edges relax toward this length.
    pub collision_distance: f64,

    /// Weight of the collision repulsion.
    pub collision_weight: f64,

    /// Weight of the bending (coplanarity) resistance.
    pub bending_weight: f64,

    /// Use a spatial index for the collision pass instead of scanning all
    /// O(n²) vertex pairs.
    pub use_spatial_index: bool,

    /// Whether the brute-force collision pass may use parallel execution
    /// (default: true). Partial accumulators are reduced afterwards, so the
    /// result matches the sequential pass.
    pub parallel: bool,
}

impl Default for GrowthOptions {
    fn default() -> Self {
        Self {
            grow: false,
            max_vertex_count: 1000,
            edge_length_weight: 1.0,
            collision_distance: 1.0,
            collision_weight: 1.0,
            bending_weight: 1.0,
            use_spatial_index: false,
            parallel: true,
        }
    }
}

impl GrowthOptions {
    /// Enable or disable the growth pass.
    pub fn with_grow(mut self, grow: bool) -> Self {
        self.grow = grow;
        self
    }

    /// Set the vertex-count ceiling for growth.
    pub fn with_max_vertex_count(mut self, max: usize) -> Self {
        self.max_vertex_count = max;
        self
    }

    /// Set the edge-length constraint weight.
    pub fn with_edge_length_weight(mut self, weight: f64) -> Self {
        self.edge_length_weight = weight;
        self
    }

    /// Set the collision distance.
    pub fn with_collision_distance(mut self, distance: f64) -> Self {
        self.collision_distance = distance;
        self
    }

    /// Set the collision repulsion weight.
    pub fn with_collision_weight(mut self, weight: f64) -> Self {
        self.collision_weight = weight;
        self
    }

    /// Set the bending resistance weight.
    pub fn with_bending_weight(mut self, weight: f64) -> Self {
        self.bending_weight = weight;
        self
    }

    /// Use a spatial index for collision queries.
    pub fn with_spatial_index(mut self, enabled: bool) -> Self {
        self.use_spatial_index = enabled;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.collision_distance.is_finite() || self.collision_distance <= 0.0 {
            return Err(GrowthError::invalid_param(
                "collision_distance",
                self.collision_distance,
                "must be positive",
            ));
        }
        for (name, weight) in [
            ("edge_length_weight", self.edge_length_weight),
            ("collision_weight", self.collision_weight),
            ("bending_weight", self.bending_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(GrowthError::invalid_param(name, weight, "must be non-negative"));
            }
        }
        Ok(())
    }
}

/// An iterative mesh-growth engine.
///
/// Owns its mesh exclusively: the mesh persists across step batches until
/// [`GrowthSystem::reset`] replaces it wholesale from a new base mesh.
#[derive(Debug)]
pub struct GrowthSystem {
    mesh: HalfEdgeMesh,
    options: GrowthOptions,
}

impl GrowthSystem {
    /// Create an engine from a base mesh.
    ///
    /// Fails if the base mesh is empty or invalid, or if the options are
    /// out of range.
    pub fn new(
        vertices: &[Point3<f64>],
        faces: &[[usize; 3]],
        options: GrowthOptions,
    ) -> Result<Self> {
        options.validate()?;
        let mesh = build_from_triangles(vertices, faces)?;
        Ok(Self { mesh, options })
    }

    /// Discard all mesh state and re-initialize from a new base mesh.
    pub fn reset(&mut self, vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<()> {
        self.mesh = build_from_triangles(vertices, faces)?;
        Ok(())
    }

    /// The current mesh.
    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    /// The current configuration.
    pub fn options(&self) -> &GrowthOptions {
        &self.options
    }

    /// Replace the configuration for subsequent steps.
    pub fn set_options(&mut self, options: GrowthOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Run `iterations` discrete update steps.
    ///
    /// Zero iterations leaves the mesh untouched.
    pub fn run(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.step();
        }
    }

    /// Advance the mesh by one discrete update step.
    pub fn step(&mut self) {
        if self.options.grow {
            self.split_long_edges();
        }

        let mut acc = self.collide();
        self.resist_bending(&mut acc);
        self.constrain_edge_lengths(&mut acc);
        acc.apply_to(&mut self.mesh);
    }

    /// Growth pass: subdivide every overlong edge at its midpoint.
    ///
    /// Scans the half-edge count captured before the pass, so edges created
    /// by splits within the same pass are not re-examined until the next
    /// step. Splits stop silently once the vertex ceiling is reached.
    fn split_long_edges(&mut self) {
        let threshold = SPLIT_THRESHOLD * self.options.collision_distance;
        let halfedge_count = self.mesh.num_halfedges();

        for i in (0..halfedge_count).step_by(2) {
            let he = HalfEdgeId::new(i);
            if self.mesh.num_vertices() < self.options.max_vertex_count
                && self.mesh.edge_length(he) > threshold
            {
                self.mesh.split_edge(he);
            }
        }
    }

    /// Collision pass: repel vertex pairs closer than the collision
    /// distance, each unordered pair visited exactly once.
    fn collide(&self) -> ForceAccumulator {
        let n = self.mesh.num_vertices();
        if self.options.collision_weight == 0.0 {
            return ForceAccumulator::new(n);
        }

        if self.options.use_spatial_index {
            self.collide_indexed()
        } else if self.options.parallel {
            (0..n)
                .into_par_iter()
                .fold(
                    || ForceAccumulator::new(n),
                    |mut local, i| {
                        self.collide_row(i, &mut local);
                        local
                    },
                )
                .reduce(|| ForceAccumulator::new(n), ForceAccumulator::merge)
        } else {
            let mut acc = ForceAccumulator::new(n);
            for i in 0..n {
                self.collide_row(i, &mut acc);
            }
            acc
        }
    }

    /// Brute-force collision contributions of vertex `i` against all
    /// partners with a larger index.
    fn collide_row(&self, i: usize, acc: &mut ForceAccumulator) {
        let dist = self.options.collision_distance;
        let weight = self.options.collision_weight;
        let vi = VertexId::new(i);
        let pi = *self.mesh.position(vi);

        for j in (i + 1)..self.mesh.num_vertices() {
            let vj = VertexId::new(j);
            let d = self.mesh.position(vj) - pi;
            let len = d.norm();
            if len > dist || len < LENGTH_EPSILON {
                continue;
            }

            // Negative for colliding pairs: i backs away along d, j along -d.
            let push = COLLISION_RESPONSE * (len - dist) / len * d;
            acc.add(vi, weight, push);
            acc.add(vj, weight, -push);
        }
    }

    /// Collision via a spatial index rebuilt from the current positions.
    fn collide_indexed(&self) -> ForceAccumulator {
        let n = self.mesh.num_vertices();
        let dist = self.options.collision_distance;
        let weight = self.options.collision_weight;
        let mut acc = ForceAccumulator::new(n);

        let mut index = PointIndex::with_capacity(n);
        for v in self.mesh.vertex_ids() {
            index.insert(self.mesh.position(v), v.index());
        }

        for i in 0..n {
            let vi = VertexId::new(i);
            let pi = *self.mesh.position(vi);

            for j in index.within(&pi, dist) {
                // Only partners with a larger tag, so each unordered pair
                // is visited once (this also drops the query point itself).
                if j <= i {
                    continue;
                }
                let vj = VertexId::new(j);
                let d = self.mesh.position(vj) - pi;
                let len = d.norm();
                if len < LENGTH_EPSILON {
                    continue;
                }

                let push = COLLISION_RESPONSE * (len - dist) / len * d;
                acc.add(vi, weight, push);
                acc.add(vj, weight, -push);
            }
        }

        acc
    }

    /// Bending pass: pull the four vertices around each interior edge
    /// toward their common best-fit plane.
    fn resist_bending(&self, acc: &mut ForceAccumulator) {
        let weight = self.options.bending_weight;
        if weight == 0.0 {
            return;
        }

        for he in self.mesh.edge_ids() {
            if self.mesh.is_boundary_edge(he) {
                continue; // No second triangle to recover an opposite vertex from
            }
            let pair = he.pair();

            let j = self.mesh.start(he);
            let k = self.mesh.start(pair);
            let p = self.mesh.start(self.mesh.prev(he));
            let q = self.mesh.start(self.mesh.prev(pair));

            let vj = *self.mesh.position(j);
            let vk = *self.mesh.position(k);
            let vp = *self.mesh.position(p);
            let vq = *self.mesh.position(q);

            // Plane normal summed from the two triangles K-J-P and Q-J-K.
            let normal = (vk - vj).cross(&(vp - vj)) + (vq - vj).cross(&(vk - vj));
            let norm_len = normal.norm();
            if norm_len < LENGTH_EPSILON {
                continue;
            }
            let unit = normal / norm_len;
            let origin = (vj.coords + vk.coords + vp.coords + vq.coords) * 0.25;

            for (v, pos) in [(j, vj), (k, vk), (p, vp), (q, vq)] {
                // closest point on plane minus the vertex
                let offset = unit.dot(&(pos.coords - origin));
                acc.add(v, weight, -offset * unit);
            }
        }
    }

    /// Edge-length pass: soft spring pulling overstretched edges back
    /// toward the collision distance. Never compresses shorter edges.
    fn constrain_edge_lengths(&self, acc: &mut ForceAccumulator) {
        let weight = self.options.edge_length_weight;
        if weight == 0.0 {
            return;
        }
        let dist = self.options.collision_distance;

        for he in self.mesh.edge_ids() {
            let j = self.mesh.start(he);
            let k = self.mesh.start(he.pair());

            let d = self.mesh.position(k) - self.mesh.position(j);
            let len = d.norm();
            if len < dist || len < LENGTH_EPSILON {
                continue;
            }

            let mv = (len - dist) * 0.5 / len * d;
            acc.add(j, weight, mv);
            acc.add(k, weight, -mv);
        }
    }
}
