//! Anatomical coordinate conventions and pose conversion.
//!
//! RAS (right-anterior-superior) and LPS (left-posterior-superior) are both
//! right-handed; they differ by a sign flip on the X and Y axes. Converting a
//! pose between them is the conjugation `T * M * T` with `T = diag(-1,-1,1,1)`,
//! which is its own inverse.

use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// Anatomical coordinate convention used for persisted poses and points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoordinateSystem {
    /// Right-anterior-superior (the scene-native convention).
    #[default]
    #[serde(rename = "RAS")]
    Ras,
    /// Left-posterior-superior.
    #[serde(rename = "LPS")]
    Lps,
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ras => write!(f, "RAS"),
            Self::Lps => write!(f, "LPS"),
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RAS" => Ok(Self::Ras),
            "LPS" => Ok(Self::Lps),
            other => Err(PlannerError::Parse {
                line: 0,
                message: format!("unknown coordinate system '{other}'"),
            }),
        }
    }
}

/// The RAS<->LPS axis flip.
const FLIP_XY: Mat4 = Mat4::from_cols(
    Vec4::new(-1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, -1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
);

/// Converts an object-to-world pose from RAS to LPS.
pub fn ras_to_lps(pose: &Mat4) -> Mat4 {
    FLIP_XY * *pose * FLIP_XY
}

/// Converts an object-to-world pose from LPS to RAS.
///
/// The flip is an involution, so this is the same conjugation as
/// [`ras_to_lps`].
pub fn lps_to_ras(pose: &Mat4) -> Mat4 {
    ras_to_lps(pose)
}

/// Converts a pose between two conventions; identity when they match.
pub fn convert_pose(pose: &Mat4, from: CoordinateSystem, to: CoordinateSystem) -> Mat4 {
    if from == to {
        *pose
    } else {
        ras_to_lps(pose)
    }
}

/// Whether the matrix has the affine bottom row `[0, 0, 0, 1]`.
///
/// The conjugation shortcut used by external tools (flipping only 8 entries)
/// is only equivalent to the full conjugation for such matrices, so poses are
/// validated before they are persisted.
pub fn is_affine(pose: &Mat4) -> bool {
    (pose.row(3) - Vec4::new(0.0, 0.0, 0.0, 1.0)).abs().max_element() < 1e-6
}

/// Formats a value with exactly four decimal digits, the fixed precision of
/// the persisted text formats. Values that round to zero are written without
/// a negative sign, so sign flips never produce `-0.0000`.
pub fn format_fixed(value: f32) -> String {
    let value = if (value * 10_000.0).round() == 0.0 { 0.0 } else { value };
    format!("{value:.4}")
}
