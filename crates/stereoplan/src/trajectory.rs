//! Trajectory records and their registry.
//!
//! A trajectory is an ordered pair of named points (target, entry) in the
//! shared point store. The registry owns the records and the single-selection
//! state; the points themselves live in the host's store and are referenced
//! only by stable id.

use glam::Vec3;

use stereoplan_core::error::{PlannerError, Result};
use stereoplan_core::frame::ViewFrame;
use stereoplan_core::point_store::{PointId, PointStore};

/// Default target position for the first trajectory.
pub const DEFAULT_TARGET: Vec3 = Vec3::ZERO;

/// Default entry position for the first trajectory.
pub const DEFAULT_ENTRY: Vec3 = Vec3::new(100.0, 100.0, 100.0);

/// Offset applied to the selected trajectory's points when spawning a new one.
pub const NEW_TRAJECTORY_OFFSET: Vec3 = Vec3::new(5.0, 5.0, 5.0);

/// An intended linear path between a target and an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trajectory {
    id: u32,
    target: PointId,
    entry: PointId,
}

impl Trajectory {
    /// Numeric id; the smallest positive integer free at creation time.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Stable id of the target point.
    pub fn target(&self) -> PointId {
        self.target
    }

    /// Stable id of the entry point.
    pub fn entry(&self) -> PointId {
        self.entry
    }

    /// Display name, `Trajectory {id}`.
    pub fn name(&self) -> String {
        format!("Trajectory {}", self.id)
    }
}

/// Registry of all trajectories, with at most one selected at a time.
#[derive(Debug, Default)]
pub struct TrajectoryRegistry {
    trajectories: Vec<Trajectory>,
    selected: Option<u32>,
}

impl TrajectoryRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trajectory, spawning and labeling its two points in the store.
    ///
    /// The new points start at the fixed defaults, or offset from the
    /// currently selected trajectory's points when one exists. The id is the
    /// smallest positive integer not currently in use; deleted ids are
    /// reused. Selection is left untouched.
    pub fn add(&mut self, store: &mut dyn PointStore) -> &Trajectory {
        let (mut target_pos, mut entry_pos) = (DEFAULT_TARGET, DEFAULT_ENTRY);
        if let Some(selected) = self.selected() {
            if let Some(p) = store.position(selected.target) {
                target_pos = p + NEW_TRAJECTORY_OFFSET;
            }
            if let Some(p) = store.position(selected.entry) {
                entry_pos = p + NEW_TRAJECTORY_OFFSET;
            }
        }

        let id = self.lowest_free_id();

        let target = store.add_point(target_pos);
        store.set_label(target, &format!("Target_{id}"));
        let entry = store.add_point(entry_pos);
        store.set_label(entry, &format!("Entry_{id}"));

        log::debug!("Added trajectory {id}");
        self.trajectories.push(Trajectory { id, target, entry });
        self.trajectories.last().expect("just pushed")
    }

    fn lowest_free_id(&self) -> u32 {
        let mut used: Vec<u32> = self.trajectories.iter().map(|t| t.id).collect();
        used.sort_unstable();
        let mut id = 1;
        for used_id in used {
            if used_id == id {
                id += 1;
            } else {
                break;
            }
        }
        id
    }

    /// Deletes a trajectory, removing both of its points from the store by
    /// stable id. Clears the selection if it pointed at the deleted one.
    pub fn delete(&mut self, id: u32, store: &mut dyn PointStore) -> Result<()> {
        let index = self
            .trajectories
            .iter()
            .position(|t| t.id == id)
            .ok_or(PlannerError::TrajectoryNotFound(id))?;

        let trajectory = self.trajectories.remove(index);
        // Removal is by id, never by sequence index: indices shift as soon as
        // the first point is gone.
        if !store.remove_point(trajectory.target) {
            log::warn!("Target point of trajectory {id} was already gone");
        }
        if !store.remove_point(trajectory.entry) {
            log::warn!("Entry point of trajectory {id} was already gone");
        }

        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("Deleted trajectory {id}");
        Ok(())
    }

    /// Deletes every trajectory and its points.
    pub fn clear(&mut self, store: &mut dyn PointStore) {
        while let Some(id) = self.trajectories.first().map(Trajectory::id) {
            // The id was just read from the list, so delete cannot fail.
            let _ = self.delete(id, store);
        }
        self.selected = None;
    }

    /// Selects a trajectory, or clears the selection with `None`.
    pub fn select(&mut self, id: Option<u32>) -> Result<()> {
        if let Some(id) = id {
            if !self.trajectories.iter().any(|t| t.id == id) {
                return Err(PlannerError::TrajectoryNotFound(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    /// The currently selected trajectory, if any.
    pub fn selected(&self) -> Option<&Trajectory> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Whether the given trajectory is the selected one.
    pub fn is_selected(&self, id: u32) -> bool {
        self.selected == Some(id)
    }

    /// Looks up a trajectory by id.
    pub fn get(&self, id: u32) -> Option<&Trajectory> {
        self.trajectories.iter().find(|t| t.id == id)
    }

    /// Iterates over trajectories in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }

    /// Number of trajectories.
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    /// Whether the registry holds no trajectories.
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Current world positions of a trajectory's (target, entry) pair, for
    /// drawing the line between them.
    pub fn endpoints(&self, id: u32, store: &dyn PointStore) -> Option<(Vec3, Vec3)> {
        let t = self.get(id)?;
        Some((store.position(t.target)?, store.position(t.entry)?))
    }

    /// Down-trajectory viewing frame: normal from entry toward target,
    /// anchored at the target.
    pub fn frame(&self, id: u32, store: &dyn PointStore) -> Result<ViewFrame> {
        let (target, entry) = self
            .endpoints(id, store)
            .ok_or(PlannerError::TrajectoryNotFound(id))?;
        ViewFrame::from_normal(target - entry, target)
    }
}
