//! Growth and relaxation algorithms.
//!
//! This module contains the iterative update machinery:
//!
//! - [`growth`] - The growth engine: edge subdivision plus collision,
//!   bending, and edge-length constraint passes
//! - [`accumulate`] - Per-vertex weighted force accumulation shared by the
//!   constraint passes

pub mod accumulate;
pub mod growth;

pub use accumulate::ForceAccumulator;
pub use growth::{GrowthOptions, GrowthSystem};
