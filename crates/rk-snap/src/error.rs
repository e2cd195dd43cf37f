//! Error types for the snapping engine

use thiserror::Error;
use uuid::Uuid;

/// Errors reported by the selection stage.
///
/// The geometric pipeline itself never fails: degenerate casts fall back to
/// plane and axis candidates. These variants only surface broken invariants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SnapError {
    #[error("No snap candidates left after filtering")]
    EmptyCandidateList,
}

/// Result type for snapping operations
pub type SnapResult<T> = Result<T, SnapError>;

/// Mesh validation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MeshError {
    #[error("Object {object}: vertex index {index} out of range ({len} vertices)")]
    IndexOutOfRange { object: Uuid, index: u32, len: usize },

    #[error("Object {object}: polygon {polygon} has fewer than 3 vertices")]
    DegeneratePolygon { object: Uuid, polygon: usize },
}
