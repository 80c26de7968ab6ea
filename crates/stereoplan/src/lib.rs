//! Trajectory and reference-plane planning engine for 3-D anatomical scenes.
//!
//! A host application owns the interactive scene; this crate owns the
//! geometry and registry logic behind it:
//! - [`TrajectoryRegistry`] — entry/target point pairs with stable numeric
//!   ids over a host-provided [`PointStore`]
//! - [`PlaneRegistry`] — oriented, sized reference planes with palette
//!   colors
//! - [`SerializationEngine`] — the line-oriented, coordinate-system-correct
//!   text formats for both
//! - [`Planner`] — the event-driven facade wiring the above to the host's
//!   point store, pose sink, and auto-save files

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod io;
pub mod plane;
pub mod planner;
pub mod trajectory;

pub use io::{ParsedTrajectory, SerializationEngine, LANDMARK_HEADER, PLANE_HEADER};
pub use plane::{
    PlaneRegistry, ReferencePlane, MAX_PLANE_EXTENT, MIN_PLANE_EXTENT, PLANE_PALETTE, SIZE_EPSILON,
};
pub use planner::{LoadOutcome, Planner};
pub use trajectory::{
    Trajectory, TrajectoryRegistry, DEFAULT_ENTRY, DEFAULT_TARGET, NEW_TRAJECTORY_OFFSET,
};

// Re-export the core crate's surface for convenience
pub use stereoplan_core::{
    convert_pose, format_fixed, is_affine, lps_to_ras, orthogonal_companions, ras_to_lps,
    CoordinateSystem, MemoryPointStore, PlannerConfig, PlannerError, PointId, PointStore, PoseSink,
    Result, ViewFrame,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
