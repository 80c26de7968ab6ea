//! Reference plane records and their registry.
//!
//! A reference plane is a positioned, oriented, sized rectangle in world
//! space. Each plane keeps a full object-to-world pose plus independent
//! width/height extents, and owns one center point in the shared store.

use glam::{Mat4, Vec3};

use stereoplan_core::coords::is_affine;
use stereoplan_core::error::{PlannerError, Result};
use stereoplan_core::point_store::{PointId, PointStore};

/// Display colors cycled over plane ids: cyan, yellow, green, magenta,
/// orange, light blue, light red.
pub const PLANE_PALETTE: [Vec3; 7] = [
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(1.0, 0.5, 0.0),
    Vec3::new(0.5, 0.5, 1.0),
    Vec3::new(1.0, 0.8, 0.8),
];

/// Smallest allowed plane extent (mm).
pub const MIN_PLANE_EXTENT: f32 = 1.0;

/// Largest allowed plane extent (mm).
pub const MAX_PLANE_EXTENT: f32 = 500.0;

/// Size changes smaller than this are ignored, so signal feedback loops from
/// the host's size controls do not trigger redundant saves.
pub const SIZE_EPSILON: f32 = 0.001;

/// An oriented, sized rectangular region in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePlane {
    id: u32,
    pose: Mat4,
    width: f32,
    height: f32,
    color: Vec3,
    center: PointId,
}

impl ReferencePlane {
    /// Numeric id; monotonically increasing, never reused.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Display name, `ReferencePlane_{id}`.
    pub fn name(&self) -> String {
        format!("ReferencePlane_{}", self.id)
    }

    /// Object-to-world pose.
    pub fn pose(&self) -> Mat4 {
        self.pose
    }

    /// Plane width (mm).
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Plane height (mm).
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Assigned display color.
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Stable id of the plane's center point.
    pub fn center(&self) -> PointId {
        self.center
    }
}

fn clamp_extent(value: f32) -> f32 {
    value.clamp(MIN_PLANE_EXTENT, MAX_PLANE_EXTENT)
}

/// Registry of all reference planes.
#[derive(Debug, Default)]
pub struct PlaneRegistry {
    planes: Vec<ReferencePlane>,
}

impl PlaneRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plane with the identity pose and a center point at the origin.
    ///
    /// Ids are `max(existing) + 1` and never gap-filled; plane naming is
    /// cosmetic, so reusing an id after deletion would only invite confusion
    /// in saved files. Extents are clamped, and the color comes from the
    /// fixed palette cycled by `(id - 1) % 7`.
    pub fn add(&mut self, store: &mut dyn PointStore, width: f32, height: f32) -> &ReferencePlane {
        let id = self.planes.iter().map(ReferencePlane::id).max().unwrap_or(0) + 1;

        let center = store.add_point(Vec3::ZERO);
        store.set_label(center, &format!("ReferencePlane_{id}_center"));

        let color = PLANE_PALETTE[((id - 1) % PLANE_PALETTE.len() as u32) as usize];
        log::debug!("Added reference plane {id}");
        self.planes.push(ReferencePlane {
            id,
            pose: Mat4::IDENTITY,
            width: clamp_extent(width),
            height: clamp_extent(height),
            color,
            center,
        });
        self.planes.last().expect("just pushed")
    }

    /// Resizes a plane. Returns whether anything actually changed: both
    /// extents are clamped first, and differences below [`SIZE_EPSILON`] are
    /// ignored.
    pub fn set_size(&mut self, id: u32, width: f32, height: f32) -> Result<bool> {
        let plane = self
            .planes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PlannerError::PlaneNotFound(id))?;

        let width = clamp_extent(width);
        let height = clamp_extent(height);
        if (plane.width - width).abs() <= SIZE_EPSILON && (plane.height - height).abs() <= SIZE_EPSILON {
            return Ok(false);
        }

        plane.width = width;
        plane.height = height;
        Ok(true)
    }

    /// Replaces a plane's object-to-world pose. Non-affine matrices are
    /// rejected; the persisted format's coordinate conversion is only valid
    /// for a `[0, 0, 0, 1]` bottom row.
    pub fn set_pose(&mut self, id: u32, pose: Mat4) -> Result<()> {
        if !is_affine(&pose) {
            return Err(PlannerError::NonAffineTransform);
        }
        let plane = self
            .planes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PlannerError::PlaneNotFound(id))?;
        plane.pose = pose;
        Ok(())
    }

    /// Deletes a plane, removing its center point from the store.
    pub fn delete(&mut self, id: u32, store: &mut dyn PointStore) -> Result<()> {
        let index = self
            .planes
            .iter()
            .position(|p| p.id == id)
            .ok_or(PlannerError::PlaneNotFound(id))?;

        let plane = self.planes.remove(index);
        if !store.remove_point(plane.center) {
            log::warn!("Center point of plane {id} was already gone");
        }
        log::debug!("Deleted reference plane {id}");
        Ok(())
    }

    /// Looks up a plane by id.
    pub fn get(&self, id: u32) -> Option<&ReferencePlane> {
        self.planes.iter().find(|p| p.id == id)
    }

    /// Iterates over planes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &ReferencePlane> {
        self.planes.iter()
    }

    /// Number of planes.
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    /// Whether the registry holds no planes.
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}
