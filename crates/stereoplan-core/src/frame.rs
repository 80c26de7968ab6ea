//! Viewing-frame construction from a single direction vector.
//!
//! A trajectory only defines one axis (its direction). To orient a cut-plane
//! or a 2-D slice view along it, a full 3-axis frame is derived here: the
//! direction becomes the frame normal and the remaining in-plane axes are
//! chosen so the view "up" points approximately toward a preferred world
//! direction, with a fallback when the two are nearly parallel.

use glam::{Mat4, Vec3};

use crate::error::{PlannerError, Result};

/// Preferred world "up" for in-plane spin: patient superior.
pub const DEFAULT_VIEW_UP: Vec3 = Vec3::Z;

/// Backup in-plane "right" when the normal is nearly parallel to up:
/// patient left.
pub const BACKUP_VIEW_RIGHT: Vec3 = Vec3::NEG_X;

/// Angle below which the normal counts as parallel to the up hint
/// (about 14.3 degrees).
pub const PARALLEL_THRESHOLD_RAD: f32 = 0.25;

const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// An orthogonal viewing frame anchored at a position.
///
/// `normal` is unit length; `in_plane_x` lies in the plane perpendicular to
/// `normal` except in the documented near-parallel fallback, where it is the
/// backup right hint taken verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    /// Standardized, normalized frame normal.
    pub normal: Vec3,
    /// Primary in-plane axis (the view's "right").
    pub in_plane_x: Vec3,
    /// Frame anchor position.
    pub position: Vec3,
}

impl ViewFrame {
    /// Builds a frame from a direction and position using the default
    /// up/right hints.
    pub fn from_normal(normal: Vec3, position: Vec3) -> Result<Self> {
        Self::from_normal_with_hints(normal, position, DEFAULT_VIEW_UP, BACKUP_VIEW_RIGHT)
    }

    /// Builds a frame from a direction and position with explicit hints.
    ///
    /// The normal's sign is standardized so its anterior-posterior (Y)
    /// component is non-negative; the frame is therefore the same for a
    /// direction and its opposite, and does not flip for near-opposite
    /// trajectory directions.
    pub fn from_normal_with_hints(
        normal: Vec3,
        position: Vec3,
        up: Vec3,
        right: Vec3,
    ) -> Result<Self> {
        if normal.length() < MIN_DIRECTION_LENGTH {
            return Err(PlannerError::DegenerateDirection);
        }

        let standardized = if normal.y >= 0.0 { normal } else { -normal };
        let standardized = standardized.normalize();

        let angle = standardized.angle_between(up);
        let in_plane_x =
            if PARALLEL_THRESHOLD_RAD < angle && angle < std::f32::consts::PI - PARALLEL_THRESHOLD_RAD {
                up.cross(standardized).normalize()
            } else {
                // Near-parallel fallback: take the right hint as-is. This is
                // not strictly orthogonal to the normal, but the hint is close
                // to perpendicular whenever this branch is reached.
                right
            };

        Ok(Self {
            normal: standardized,
            in_plane_x,
            position,
        })
    }

    /// Secondary in-plane axis (the view's "up"), completing a right-handed
    /// basis `(in_plane_x, in_plane_y, normal)`.
    pub fn in_plane_y(&self) -> Vec3 {
        self.normal.cross(self.in_plane_x).normalize()
    }

    /// Full object-to-world pose with Z along the normal and translation at
    /// the frame position.
    pub fn to_pose(&self) -> Mat4 {
        Mat4::from_cols(
            self.in_plane_x.extend(0.0),
            self.in_plane_y().extend(0.0),
            self.normal.extend(0.0),
            self.position.extend(1.0),
        )
    }
}

/// Companion poses for the two views orthogonal to a slice pose.
///
/// Given the pose of a view looking down a trajectory, returns the poses of
/// the two remaining views, spun in-plane so all three stay mutually
/// orthogonal (the original axial/sagittal/coronal triad follows the
/// trajectory together).
pub fn orthogonal_companions(pose: &Mat4) -> [Mat4; 2] {
    // Row-major axis swaps, applied on the right of the slice pose.
    let swap_sagittal = Mat4::from_cols_array_2d(&[
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
    .transpose();
    let swap_coronal = Mat4::from_cols_array_2d(&[
        [0.0, 0.0, -1.0, 0.0],
        [-1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
    .transpose();

    [*pose * swap_sagittal, *pose * swap_coronal]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_main_branch_orthonormal() {
        let frame = ViewFrame::from_normal(Vec3::new(3.0, 1.0, -2.0), Vec3::ZERO).unwrap();
        let x = frame.in_plane_x;
        let y = frame.in_plane_y();
        let n = frame.normal;

        assert!((x.length() - 1.0).abs() < EPS);
        assert!((y.length() - 1.0).abs() < EPS);
        assert!((n.length() - 1.0).abs() < EPS);
        assert!(x.dot(y).abs() < EPS);
        assert!(x.dot(n).abs() < EPS);
        assert!(y.dot(n).abs() < EPS);
    }

    #[test]
    fn test_sign_standardization_is_even() {
        let n = Vec3::new(0.3, 0.7, -0.4);
        let a = ViewFrame::from_normal(n, Vec3::ZERO).unwrap();
        let b = ViewFrame::from_normal(-n, Vec3::ZERO).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_near_parallel_fallback_uses_right_hint() {
        // Almost exactly the up direction: the cross product would degenerate.
        let frame = ViewFrame::from_normal(Vec3::new(0.01, 0.0, 1.0), Vec3::ZERO).unwrap();
        assert_eq!(frame.in_plane_x, BACKUP_VIEW_RIGHT);

        // Anti-parallel case takes the same fallback after standardization.
        let frame = ViewFrame::from_normal(Vec3::new(-0.01, 0.0, -1.0), Vec3::ZERO).unwrap();
        assert_eq!(frame.in_plane_x, BACKUP_VIEW_RIGHT);
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        let err = ViewFrame::from_normal(Vec3::ZERO, Vec3::ONE).unwrap_err();
        assert!(matches!(err, PlannerError::DegenerateDirection));
    }

    #[test]
    fn test_pose_is_rigid() {
        let frame = ViewFrame::from_normal(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0))
            .unwrap();
        let pose = frame.to_pose();

        let row3 = pose.row(3);
        assert!((row3 - glam::Vec4::new(0.0, 0.0, 0.0, 1.0)).length() < EPS);
        assert!((pose.determinant() - 1.0).abs() < 1e-4);
        assert_eq!(pose.col(3).truncate(), frame.position);
    }

    #[test]
    fn test_companion_poses_are_rigid() {
        let frame = ViewFrame::from_normal(Vec3::new(1.0, 1.0, 0.5), Vec3::new(1.0, 2.0, 3.0))
            .unwrap();
        let [sagittal, coronal] = orthogonal_companions(&frame.to_pose());

        for pose in [sagittal, coronal] {
            let row3 = pose.row(3);
            assert!((row3 - glam::Vec4::new(0.0, 0.0, 0.0, 1.0)).length() < EPS);
            assert!((pose.determinant().abs() - 1.0).abs() < 1e-4);
            // Translation is shared with the primary view.
            assert_eq!(pose.col(3).truncate(), frame.position);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arbitrary_direction() -> impl Strategy<Value = Vec3> {
            (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0)
                .prop_map(|(x, y, z)| Vec3::new(x, y, z))
                .prop_filter("non-degenerate", |v| v.length() > 0.01)
        }

        proptest! {
            #[test]
            fn frame_axes_are_orthonormal_outside_fallback(normal in arbitrary_direction()) {
                let frame = ViewFrame::from_normal(normal, Vec3::ZERO).unwrap();
                let angle = frame.normal.angle_between(DEFAULT_VIEW_UP);
                prop_assume!(
                    PARALLEL_THRESHOLD_RAD + 0.01 < angle
                        && angle < std::f32::consts::PI - PARALLEL_THRESHOLD_RAD - 0.01
                );

                let x = frame.in_plane_x;
                let y = frame.in_plane_y();
                let n = frame.normal;
                prop_assert!((x.length() - 1.0).abs() < 1e-4);
                prop_assert!((n.length() - 1.0).abs() < 1e-4);
                prop_assert!(x.dot(y).abs() < 1e-4);
                prop_assert!(x.dot(n).abs() < 1e-4);
                prop_assert!(y.dot(n).abs() < 1e-4);
            }

            #[test]
            fn frame_is_even_in_direction(normal in arbitrary_direction()) {
                prop_assume!(normal.y.abs() > 1e-3);
                let a = ViewFrame::from_normal(normal, Vec3::ZERO).unwrap();
                let b = ViewFrame::from_normal(-normal, Vec3::ZERO).unwrap();
                prop_assert!((a.normal - b.normal).length() < 1e-6);
                prop_assert!((a.in_plane_x - b.in_plane_x).length() < 1e-6);
            }
        }
    }
}
