//! The point-store capability consumed by the planning engine.
//!
//! The host application owns the actual 3-D scene; the engine only needs a
//! narrow, stable-identifier view of its point list. [`MemoryPointStore`] is
//! the in-process implementation used by tests and by hosts without a scene
//! of their own.

use std::fmt;

use glam::Vec3;

/// Stable identifier for a point in a [`PointStore`].
///
/// Ids stay valid across other points' insertion and removal, and are never
/// reused for a different logical point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point-{}", self.0)
    }
}

/// Read/write access to an ordered, labeled point list with stable ids.
///
/// Mutators that take an id return whether the id resolved; an unknown id is
/// a no-op, mirroring how a shared scene tolerates stale lookups.
pub trait PointStore {
    /// Adds a point and returns its stable id.
    fn add_point(&mut self, position: Vec3) -> PointId;

    /// Removes a point by id. Returns false if the id was not present.
    fn remove_point(&mut self, id: PointId) -> bool;

    /// Current position of a point.
    fn position(&self, id: PointId) -> Option<Vec3>;

    /// Moves a point. Returns false if the id was not present.
    fn set_position(&mut self, id: PointId, position: Vec3) -> bool;

    /// Current label of a point.
    fn label(&self, id: PointId) -> Option<String>;

    /// Relabels a point. Returns false if the id was not present.
    fn set_label(&mut self, id: PointId, label: &str) -> bool;

    /// Id of the point at a sequence position.
    fn id_at(&self, index: usize) -> Option<PointId>;

    /// Sequence position of a point. Positions shift as other points are
    /// removed; only ids are stable.
    fn index_of(&self, id: PointId) -> Option<usize>;

    /// Number of points currently in the store.
    fn len(&self) -> usize;

    /// Whether the store holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
struct PointRecord {
    id: PointId,
    position: Vec3,
    label: String,
}

/// Insertion-ordered in-memory [`PointStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPointStore {
    points: Vec<PointRecord>,
    next_id: u64,
}

impl MemoryPointStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, id: PointId) -> Option<&PointRecord> {
        self.points.iter().find(|p| p.id == id)
    }

    fn find_mut(&mut self, id: PointId) -> Option<&mut PointRecord> {
        self.points.iter_mut().find(|p| p.id == id)
    }
}

impl PointStore for MemoryPointStore {
    fn add_point(&mut self, position: Vec3) -> PointId {
        let id = PointId(self.next_id);
        self.next_id += 1;
        self.points.push(PointRecord {
            id,
            position,
            label: String::new(),
        });
        id
    }

    fn remove_point(&mut self, id: PointId) -> bool {
        match self.points.iter().position(|p| p.id == id) {
            Some(index) => {
                self.points.remove(index);
                true
            }
            None => false,
        }
    }

    fn position(&self, id: PointId) -> Option<Vec3> {
        self.find(id).map(|p| p.position)
    }

    fn set_position(&mut self, id: PointId, position: Vec3) -> bool {
        match self.find_mut(id) {
            Some(p) => {
                p.position = position;
                true
            }
            None => false,
        }
    }

    fn label(&self, id: PointId) -> Option<String> {
        self.find(id).map(|p| p.label.clone())
    }

    fn set_label(&mut self, id: PointId, label: &str) -> bool {
        match self.find_mut(id) {
            Some(p) => {
                p.label = label.to_string();
                true
            }
            None => false,
        }
    }

    fn id_at(&self, index: usize) -> Option<PointId> {
        self.points.get(index).map(|p| p.id)
    }

    fn index_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
