//! Error types for burgeon.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`GrowthError`].
pub type Result<T> = std::result::Result<T, GrowthError>;

/// Errors that can occur while building a mesh or configuring the engine.
#[derive(Error, Debug)]
pub enum GrowthError {
    /// The base mesh has no vertices or no faces.
    #[error("base mesh has no vertices or faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge is traversed in the same direction by two faces, or shared
    /// by more than two faces.
    #[error("edge ({v0}, {v1}) is non-manifold")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A vertex joins two otherwise unconnected surface fans (a "bowtie"),
    /// so its boundary cannot be linked into well-formed loops.
    #[error("vertex {vertex} is non-manifold (joins multiple surface fans)")]
    NonManifoldVertex {
        /// The offending vertex index.
        vertex: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl GrowthError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        GrowthError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
