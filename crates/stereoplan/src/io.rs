//! Text serialization of trajectories and reference planes.
//!
//! Both formats are line-oriented and comma-separated: three `#` comment
//! lines (tool banner, ISO-8601 timestamp, coordinate-system tag), a fixed
//! header row, then one data row per point or plane with all numerics at
//! exactly four decimal digits. This is the persisted-state layout and the
//! wire contract for external analysis tools.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use glam::Vec3;

use stereoplan_core::coords::{convert_pose, format_fixed, CoordinateSystem};
use stereoplan_core::error::{PlannerError, Result};
use stereoplan_core::point_store::PointStore;

use crate::plane::PlaneRegistry;

const LANDMARK_BANNER: &str = "# StereoPlan Landmarks Output";
const PLANE_BANNER: &str = "# StereoPlan Reference Planes Output";

/// Header row of the landmark file.
pub const LANDMARK_HEADER: &str = "Trajectory,Landmark,X,Y,Z";

/// Header row of the plane file.
pub const PLANE_HEADER: &str = "PlaneName,Matrix00,Matrix01,Matrix02,Matrix03,\
Matrix10,Matrix11,Matrix12,Matrix13,Matrix20,Matrix21,Matrix22,Matrix23,\
Matrix30,Matrix31,Matrix32,Matrix33,Width,Height";

/// A trajectory reconstructed from a landmark file, grouped by suffix id.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParsedTrajectory {
    /// Numeric suffix of the `traj_{id}` group.
    pub id: u32,
    /// Parsed target position, when a `Target` row was present.
    pub target: Option<Vec3>,
    /// Parsed entry position, when an `Entry` row was present.
    pub entry: Option<Vec3>,
}

/// Writes and reads the trajectory and plane text formats.
#[derive(Debug, Clone, Copy)]
pub struct SerializationEngine {
    coordinate_system: CoordinateSystem,
}

impl SerializationEngine {
    /// Creates an engine emitting the given coordinate-system tag.
    pub fn new(coordinate_system: CoordinateSystem) -> Self {
        Self { coordinate_system }
    }

    /// The coordinate convention this engine writes.
    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }

    fn write_preamble<W: Write>(&self, w: &mut W, banner: &str, header: &str) -> Result<()> {
        writeln!(w, "{banner}")?;
        writeln!(w, "# Timestamp: {}", chrono::Local::now().to_rfc3339())?;
        writeln!(w, "# CoordinateSystem: {}", self.coordinate_system)?;
        writeln!(w, "{header}")?;
        Ok(())
    }

    /// Writes one landmark row per point in store order.
    ///
    /// The trajectory column is derived from the point label's last
    /// `_`-suffix (`Target_3` becomes `traj_3`); labels without an
    /// underscore are written under `unknown`.
    pub fn write_trajectories<W: Write>(&self, w: &mut W, store: &dyn PointStore) -> Result<()> {
        self.write_preamble(w, LANDMARK_BANNER, LANDMARK_HEADER)?;

        for index in 0..store.len() {
            let Some(id) = store.id_at(index) else { continue };
            let label = store.label(id).unwrap_or_default();
            let position = store.position(id).unwrap_or(Vec3::ZERO);

            let trajectory = match label.rsplit_once('_') {
                Some((_, suffix)) => format!("traj_{suffix}"),
                None => "unknown".to_string(),
            };
            writeln!(
                w,
                "{trajectory},{label},{},{},{}",
                format_fixed(position.x),
                format_fixed(position.y),
                format_fixed(position.z),
            )?;
        }
        Ok(())
    }

    /// Writes the landmark file to a path.
    pub fn save_trajectories(&self, path: &Path, store: &dyn PointStore) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_trajectories(&mut writer, store)?;
        writer.flush()?;
        log::info!("Updated landmarks in {}", path.display());
        Ok(())
    }

    /// Parses a landmark file into per-trajectory position pairs, ordered by
    /// ascending id.
    ///
    /// Comment lines, the header row, and rows with fewer than five fields
    /// are skipped, as are rows whose trajectory name carries no id suffix.
    /// A malformed coordinate or suffix aborts the whole read; partial
    /// recovery is deliberately not attempted.
    pub fn read_trajectories<R: BufRead>(&self, reader: R) -> Result<Vec<ParsedTrajectory>> {
        let mut groups: BTreeMap<u32, ParsedTrajectory> = BTreeMap::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.contains(LANDMARK_HEADER) {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 5 {
                continue;
            }
            let (trajectory, label) = (fields[0], fields[1]);
            let position = parse_position(&fields[2..5], number + 1)?;

            let Some((_, suffix)) = trajectory.rsplit_once('_') else {
                continue;
            };
            let id: u32 = suffix.parse().map_err(|_| PlannerError::Parse {
                line: number + 1,
                message: format!("invalid trajectory id '{suffix}'"),
            })?;

            let group = groups.entry(id).or_insert(ParsedTrajectory {
                id,
                ..ParsedTrajectory::default()
            });
            if label.contains("Target") {
                group.target = Some(position);
            } else if label.contains("Entry") {
                group.entry = Some(position);
            }
        }

        Ok(groups.into_values().collect())
    }

    /// Reads a landmark file from a path.
    pub fn load_trajectories(&self, path: &Path) -> Result<Vec<ParsedTrajectory>> {
        self.read_trajectories(BufReader::new(File::open(path)?))
    }

    /// Writes one row per plane: name, the 16 row-major pose entries, width,
    /// height. Poses are converted out of scene-native RAS when this engine
    /// is tagged LPS.
    pub fn write_planes<W: Write>(&self, w: &mut W, planes: &PlaneRegistry) -> Result<()> {
        self.write_preamble(w, PLANE_BANNER, PLANE_HEADER)?;

        for plane in planes.iter() {
            let pose = convert_pose(&plane.pose(), CoordinateSystem::Ras, self.coordinate_system);
            let cols = pose.to_cols_array_2d();

            write!(w, "{}", plane.name())?;
            for row in 0..4 {
                for col in 0..4 {
                    write!(w, ",{}", format_fixed(cols[col][row]))?;
                }
            }
            writeln!(
                w,
                ",{},{}",
                format_fixed(plane.width()),
                format_fixed(plane.height())
            )?;
        }
        Ok(())
    }

    /// Writes the plane file to a path.
    pub fn save_planes(&self, path: &Path, planes: &PlaneRegistry) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_planes(&mut writer, planes)?;
        writer.flush()?;
        log::info!("Updated planes in {}", path.display());
        Ok(())
    }
}

fn parse_position(fields: &[&str], line: usize) -> Result<Vec3> {
    let mut values = [0.0f32; 3];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field.trim().parse().map_err(|_| PlannerError::Parse {
            line,
            message: format!("invalid coordinate '{field}'"),
        })?;
    }
    Ok(Vec3::from_array(values))
}
