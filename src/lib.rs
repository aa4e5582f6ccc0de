//! # burgeon
//!
//! An iterative mesh-growth engine built on a half-edge mesh.
//!
//! A [`GrowthSystem`](algo::GrowthSystem) owns a triangle mesh and advances
//! it in discrete steps: overlong edges subdivide at their midpoints while
//! collision repulsion, bending resistance, and edge-length constraints
//! relax the vertex positions. Out of these local rules organic, folded
//! surfaces emerge.
//!
//! ## Quick Start
//!
//! ```
//! use burgeon::prelude::*;
//! use nalgebra::Point3;
//!
//! // A small tetrahedron as the base mesh.
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
//!     .with_max_vertex_count(500)
//!     .with_collision_distance(0.4)
//!     .with_spatial_index(true);
//!
//! let mut system = GrowthSystem::new(&vertices, &faces, options)?;
//! system.run(20);
//!
//! let (out_vertices, out_faces) = to_face_vertex(system.mesh());
//! assert!(out_vertices.len() <= 500);
//! # Ok::<(), burgeon::GrowthError>(())
//! ```
//!
//! ## Modules
//!
//! - [`mesh`] - Half-edge mesh with positionally paired half-edges
//! - [`algo`] - The growth engine and its constraint passes
//! - [`spatial`] - Point index for sub-quadratic collision queries
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;
pub mod spatial;

pub use error::{GrowthError, Result};

// Re-export nalgebra so callers can use the same version for positions.
pub use nalgebra;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::algo::{GrowthOptions, GrowthSystem};
    pub use crate::error::{GrowthError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, HalfEdgeMesh, VertexId,
    };
}
