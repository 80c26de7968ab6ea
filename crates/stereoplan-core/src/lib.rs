//! Core abstractions for stereoplan.
//!
//! This crate provides the fundamental types used throughout stereoplan:
//! - [`ViewFrame`] construction from a single direction vector
//! - Coordinate-system conversion between the RAS and LPS conventions
//! - The [`PointStore`] and [`PoseSink`] capabilities the host implements
//! - Configuration and the shared error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod coords;
pub mod error;
pub mod frame;
pub mod point_store;
pub mod pose_sink;

pub use config::PlannerConfig;
pub use coords::{convert_pose, format_fixed, is_affine, lps_to_ras, ras_to_lps, CoordinateSystem};
pub use error::{PlannerError, Result};
pub use frame::{
    orthogonal_companions, ViewFrame, BACKUP_VIEW_RIGHT, DEFAULT_VIEW_UP, PARALLEL_THRESHOLD_RAD,
};
pub use point_store::{MemoryPointStore, PointId, PointStore};
pub use pose_sink::PoseSink;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
