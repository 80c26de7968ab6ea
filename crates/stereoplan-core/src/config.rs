//! Planner configuration.
//!
//! Loaded once at startup by the host; the engine only reads values through
//! it. A missing or unreadable file falls back to defaults so the planner is
//! always usable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::coords::CoordinateSystem;

/// Configuration for the planning engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Auto-save destination for the trajectory landmark file.
    pub output_file: PathBuf,

    /// Auto-save destination for the reference plane file.
    pub output_plane_file: PathBuf,

    /// Coordinate convention tag written into persisted files.
    pub coordinate_system: CoordinateSystem,

    /// Default reference plane width (mm).
    pub default_width: f32,

    /// Default reference plane height (mm).
    pub default_height: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("/tmp/stereoplan_landmarks.txt"),
            output_plane_file: PathBuf::from("/tmp/stereoplan_planes.txt"),
            coordinate_system: CoordinateSystem::Ras,
            default_width: 150.0,
            default_height: 150.0,
        }
    }
}

impl PlannerConfig {
    /// Loads configuration from a JSON file, falling back to defaults when
    /// the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Malformed config {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Config not found at {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
