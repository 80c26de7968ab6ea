//! Error types for stereoplan.

use thiserror::Error;

use crate::point_store::PointId;

/// The main error type for stereoplan operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A direction vector was too short to define a viewing frame.
    #[error("direction vector is zero or too short to define a frame")]
    DegenerateDirection,

    /// A trajectory with the given id was not found.
    #[error("trajectory {0} not found")]
    TrajectoryNotFound(u32),

    /// A reference plane with the given id was not found.
    #[error("reference plane {0} not found")]
    PlaneNotFound(u32),

    /// A point id could not be resolved in the point store.
    #[error("point {0} not found in point store")]
    PointNotFound(PointId),

    /// A pose matrix did not have the affine bottom row `[0, 0, 0, 1]`.
    #[error("pose matrix bottom row must be [0, 0, 0, 1]")]
    NonAffineTransform,

    /// A persisted file could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (configuration) error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for stereoplan operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
