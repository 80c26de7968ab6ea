//! The slice-view capability consumed by the planning engine.

use glam::Vec3;

use crate::frame::ViewFrame;

/// Receiver for derived view poses.
///
/// A host wires its 2-D slice views (or any other oriented display) behind
/// this trait; the engine pushes poses and never touches the views directly.
pub trait PoseSink {
    /// Orients the down-trajectory view to the given frame. Implementations
    /// that drive several mutually orthogonal views can derive the companions
    /// with [`crate::frame::orthogonal_companions`].
    fn set_slice_pose(&mut self, frame: &ViewFrame);

    /// Restores the default axial/sagittal/coronal orientations.
    fn reset_default_orientations(&mut self);

    /// Centers the views on a world position.
    fn jump_to(&mut self, position: Vec3);
}
