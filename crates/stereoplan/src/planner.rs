//! The planner facade.
//!
//! Ties the configuration, the registries, the host's point stores, and the
//! optional pose sink together, and owns the auto-save policy: every
//! mutation that changes persisted state synchronously rewrites the small
//! auto-save files. Auto-save failures are diagnostics, never fatal; the
//! next successful save overwrites whatever was left behind.
//!
//! Trajectory landmarks and plane center points live in two separate stores,
//! mirroring a host scene where they are distinct node collections; the
//! landmark file covers exactly the landmark store.

use std::path::Path;

use stereoplan_core::config::PlannerConfig;
use stereoplan_core::error::Result;
use stereoplan_core::point_store::{PointId, PointStore};
use stereoplan_core::pose_sink::PoseSink;

use crate::io::SerializationEngine;
use crate::plane::PlaneRegistry;
use crate::trajectory::TrajectoryRegistry;

/// Result of a landmark load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was loaded; the count is the number of trajectories rebuilt.
    Loaded(usize),
    /// The destructive-action confirmation was declined; nothing changed.
    Cancelled,
}

/// Single-threaded planning engine driven by host events.
pub struct Planner<S: PointStore> {
    config: PlannerConfig,
    landmarks: S,
    plane_points: S,
    trajectories: TrajectoryRegistry,
    planes: PlaneRegistry,
    engine: SerializationEngine,
    pose_sink: Option<Box<dyn PoseSink>>,
}

impl<S: PointStore> Planner<S> {
    /// Creates a planner over the host's landmark and plane point stores.
    pub fn new(config: PlannerConfig, landmarks: S, plane_points: S) -> Self {
        let engine = SerializationEngine::new(config.coordinate_system);
        Self {
            config,
            landmarks,
            plane_points,
            trajectories: TrajectoryRegistry::new(),
            planes: PlaneRegistry::new(),
            engine,
            pose_sink: None,
        }
    }

    /// Attaches a pose sink for slice-view side effects.
    pub fn with_pose_sink(mut self, sink: Box<dyn PoseSink>) -> Self {
        self.pose_sink = Some(sink);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The store holding trajectory landmark points.
    pub fn landmark_store(&self) -> &S {
        &self.landmarks
    }

    /// The store holding plane center points.
    pub fn plane_point_store(&self) -> &S {
        &self.plane_points
    }

    /// The trajectory registry.
    pub fn trajectories(&self) -> &TrajectoryRegistry {
        &self.trajectories
    }

    /// The plane registry.
    pub fn planes(&self) -> &PlaneRegistry {
        &self.planes
    }

    // ------------------------------------------------------------------
    // Trajectories
    // ------------------------------------------------------------------

    /// Adds a trajectory, selects it, and auto-saves. Returns the new id.
    pub fn add_trajectory(&mut self) -> u32 {
        let id = self.trajectories.add(&mut self.landmarks).id();
        // A fresh trajectory cannot fail to select.
        let _ = self.select_trajectory(Some(id));
        self.autosave_landmarks();
        id
    }

    /// Deletes the selected trajectory and auto-saves. With no selection
    /// this is a logged no-op.
    pub fn delete_selected_trajectory(&mut self) {
        let Some(id) = self.trajectories.selected().map(|t| t.id()) else {
            log::warn!("No trajectory selected to delete");
            return;
        };
        // The id came from the live selection, so delete cannot fail.
        let _ = self.trajectories.delete(id, &mut self.landmarks);
        self.autosave_landmarks();
    }

    /// Changes the selection. The previous down-axis view is reset and the
    /// views jump to the newly selected target.
    pub fn select_trajectory(&mut self, id: Option<u32>) -> Result<()> {
        if self.trajectories.selected().is_some() {
            if let Some(sink) = self.pose_sink.as_mut() {
                sink.reset_default_orientations();
            }
        }
        self.trajectories.select(id)?;
        self.jump_to_target();
        Ok(())
    }

    /// Orients the slice views down the selected trajectory. Missing
    /// selection or a degenerate (zero-length) trajectory is a logged no-op.
    pub fn align_axes_to_trajectory(&mut self) {
        let Some(id) = self.trajectories.selected().map(|t| t.id()) else {
            log::warn!("No trajectory selected to align to");
            return;
        };
        let frame = match self.trajectories.frame(id, &self.landmarks) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Cannot align to trajectory {id}: {e}");
                return;
            }
        };
        if let Some(sink) = self.pose_sink.as_mut() {
            sink.set_slice_pose(&frame);
        }
        self.jump_to_target();
    }

    /// Restores the default axial/sagittal/coronal orientations, keeping the
    /// views centered on the selected target.
    pub fn reset_axes(&mut self) {
        if let Some(sink) = self.pose_sink.as_mut() {
            sink.reset_default_orientations();
        }
        self.jump_to_target();
    }

    /// Centers the views on the selected trajectory's target point.
    pub fn jump_to_target(&mut self) {
        let position = self
            .trajectories
            .selected()
            .and_then(|t| self.landmarks.position(t.target()));
        if let (Some(position), Some(sink)) = (position, self.pose_sink.as_mut()) {
            sink.jump_to(position);
        }
    }

    /// Centers the views on the selected trajectory's entry point.
    pub fn jump_to_entry(&mut self) {
        let position = self
            .trajectories
            .selected()
            .and_then(|t| self.landmarks.position(t.entry()));
        if let (Some(position), Some(sink)) = (position, self.pose_sink.as_mut()) {
            sink.jump_to(position);
        }
    }

    /// Moves the selected trajectory's target point and auto-saves. No
    /// selection is a logged no-op.
    pub fn move_target(&mut self, position: glam::Vec3) {
        self.move_selected_point(position, true);
    }

    /// Moves the selected trajectory's entry point and auto-saves. No
    /// selection is a logged no-op.
    pub fn move_entry(&mut self, position: glam::Vec3) {
        self.move_selected_point(position, false);
    }

    fn move_selected_point(&mut self, position: glam::Vec3, target: bool) {
        let Some(t) = self.trajectories.selected() else {
            log::warn!("No trajectory selected to move");
            return;
        };
        let id = if target { t.target() } else { t.entry() };
        self.landmarks.set_position(id, position);
        self.autosave_landmarks();
    }

    // ------------------------------------------------------------------
    // Reference planes
    // ------------------------------------------------------------------

    /// Adds a plane with the configured default extents and auto-saves.
    /// Returns the new id.
    pub fn add_plane(&mut self) -> u32 {
        let id = self
            .planes
            .add(&mut self.plane_points, self.config.default_width, self.config.default_height)
            .id();
        self.autosave_planes();
        id
    }

    /// Resizes a plane; saves only when the registry reports a real change.
    pub fn set_plane_size(&mut self, id: u32, width: f32, height: f32) -> Result<()> {
        if self.planes.set_size(id, width, height)? {
            self.autosave_planes();
        }
        Ok(())
    }

    /// Repositions a plane and auto-saves.
    pub fn set_plane_pose(&mut self, id: u32, pose: glam::Mat4) -> Result<()> {
        self.planes.set_pose(id, pose)?;
        self.autosave_planes();
        Ok(())
    }

    /// Deletes a plane and auto-saves.
    pub fn delete_plane(&mut self, id: u32) -> Result<()> {
        self.planes.delete(id, &mut self.plane_points)?;
        self.autosave_planes();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Host event entry points
    // ------------------------------------------------------------------

    /// Called by the host while a point is being dragged. Cheap by design;
    /// interactive dragging fires this at high frequency.
    pub fn on_point_modified(&mut self, id: PointId) {
        log::debug!("Point {id} modified");
    }

    /// Called by the host when a point drag ends; persists the move.
    pub fn on_point_end_interaction(&mut self, _id: PointId) {
        self.autosave_landmarks();
    }

    /// Called by the host when a plane widget was moved or rotated.
    pub fn on_plane_moved(&mut self, id: u32, pose: glam::Mat4) -> Result<()> {
        self.set_plane_pose(id, pose)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn autosave_landmarks(&self) {
        if let Err(e) = self.engine.save_trajectories(&self.config.output_file, &self.landmarks) {
            log::warn!("Failed to auto-save landmarks: {e}");
        }
    }

    fn autosave_planes(&self) {
        if let Err(e) = self.engine.save_planes(&self.config.output_plane_file, &self.planes) {
            log::warn!("Failed to auto-save planes: {e}");
        }
    }

    /// Manually saves the landmark file to a path.
    pub fn save_landmarks_to(&self, path: &Path) -> Result<()> {
        self.engine.save_trajectories(path, &self.landmarks)
    }

    /// Manually saves the plane file to a path.
    pub fn save_planes_to(&self, path: &Path) -> Result<()> {
        self.engine.save_planes(path, &self.planes)
    }

    /// Replaces all trajectories with the contents of a landmark file.
    ///
    /// `confirm` is the destructive-action gate: it is invoked before
    /// anything is touched, and declining leaves the scene exactly as it
    /// was. After confirmation the existing trajectories are cleared, the
    /// file is parsed (a parse error aborts the load), and each parsed
    /// trajectory is rebuilt through the registry's own numbering with its
    /// point positions overwritten from the file. The last loaded
    /// trajectory ends up selected.
    pub fn load_trajectories<F>(&mut self, path: &Path, confirm: F) -> Result<LoadOutcome>
    where
        F: FnOnce() -> bool,
    {
        std::fs::metadata(path)?;

        if !confirm() {
            log::info!("Landmark load cancelled");
            return Ok(LoadOutcome::Cancelled);
        }

        self.trajectories.clear(&mut self.landmarks);

        let parsed = self.engine.load_trajectories(path)?;
        let mut last = None;
        for group in &parsed {
            let trajectory = *self.trajectories.add(&mut self.landmarks);
            if let Some(position) = group.target {
                self.landmarks.set_position(trajectory.target(), position);
            }
            if let Some(position) = group.entry {
                self.landmarks.set_position(trajectory.entry(), position);
            }
            last = Some(trajectory.id());
        }

        if last.is_some() {
            let _ = self.select_trajectory(last);
        }
        self.autosave_landmarks();
        log::info!("Loaded {} trajectories from {}", parsed.len(), path.display());
        Ok(LoadOutcome::Loaded(parsed.len()))
    }
}
