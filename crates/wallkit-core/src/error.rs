//! Error types for the WallKit core crate.
//!
//! Geometric failures are fatal for a planning run: a degenerate guide or a
//! contour that refuses to close aborts the whole computation instead of
//! yielding a partial blueprint.

use thiserror::Error;

/// Errors raised by the curve kernel and guide validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// No usable input was provided.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A guide segment has zero length.
    #[error("Degenerate guide segment {index}: zero length")]
    Degenerate {
        /// Index of the offending segment.
        index: usize,
    },

    /// The guide points do not share a single plane.
    #[error("Guide is not planar: z deviates by {deviation:.6}")]
    NonPlanar {
        /// Largest z deviation from the first point.
        deviation: f64,
    },

    /// A segment turns straight back onto its predecessor.
    #[error("Guide segment {index} reverses onto the previous segment")]
    Reversal {
        /// Index of the reversing segment.
        index: usize,
    },

    /// A segment is too short to host its corner offsets.
    #[error("Guide segment {index} is too short: symmetry axis length {axis_length:.3}")]
    SegmentTooShort {
        /// Index of the offending segment.
        index: usize,
        /// Signed axis length that was computed.
        axis_length: f64,
    },

    /// Curves that were expected to form one connected curve did not.
    #[error("Join failed: expected one connected curve, got {fragments}")]
    JoinFailed {
        /// Number of fragments the join produced.
        fragments: usize,
    },

    /// A joined curve was expected to be closed but is open.
    #[error("Joined contour is not closed")]
    OpenContour,

    /// Parallel offsetting produced nothing.
    #[error("Offset of {distance:.3} produced no curve")]
    OffsetFailed {
        /// Requested offset distance.
        distance: f64,
    },
}

/// Result type alias for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
