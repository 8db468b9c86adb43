//! Error types for the layout crate.
//!
//! Geometric failures bubble up from the curve kernel unchanged; parameter
//! problems that clamping cannot repair and export failures get their own
//! variants.

use std::io;
use thiserror::Error;
use wallkit_core::GeometryError;

/// Errors that can occur while planning or exporting a wall.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Invalid parameters were provided to the layout engine.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A geometry operation failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// A blueprint refers to a part, contour or segment it does not hold.
    #[error("Inconsistent blueprint: {0}")]
    InconsistentBlueprint(String),

    /// Writing an export format failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
