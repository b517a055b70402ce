//! Per-mesh settings consumed by wall ordering.
//!
//! Setting names and enum spellings follow the usual slicer setting keys, so a
//! settings file exported from a profile can be loaded directly.

use super::{ConfigError, ConfigResult};
use crate::{scale, Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Strategy for placing the seam of a closed wall loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EZSeamType {
    /// Pseudo-random vertex, stable for identical geometry.
    #[serde(rename = "random")]
    Random,
    /// Vertex closest to the current nozzle position.
    #[default]
    #[serde(rename = "shortest")]
    Shortest,
    /// Vertex closest to the user-specified seam position.
    #[serde(rename = "back")]
    UserSpecified,
    /// Sharpest corner, filtered by the corner preference.
    #[serde(rename = "sharpest_corner")]
    SharpestCorner,
}

impl fmt::Display for EZSeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EZSeamType::Random => write!(f, "random"),
            EZSeamType::Shortest => write!(f, "shortest"),
            EZSeamType::UserSpecified => write!(f, "back"),
            EZSeamType::SharpestCorner => write!(f, "sharpest_corner"),
        }
    }
}

/// Which kind of corner the seam prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EZSeamCornerPrefType {
    /// No corner preference.
    #[serde(rename = "z_seam_corner_none")]
    None,
    /// Hide the seam in concave corners.
    #[default]
    #[serde(rename = "z_seam_corner_inner")]
    Inner,
    /// Expose the seam on convex corners.
    #[serde(rename = "z_seam_corner_outer")]
    Outer,
    /// Either kind of corner, whichever is sharper.
    #[serde(rename = "z_seam_corner_any")]
    Any,
    /// Concave corners first, convex corners at a discount.
    #[serde(rename = "z_seam_corner_weighted")]
    Weighted,
}

/// Mesh settings read by the wall ordering stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Reorder walls within a depth to reduce travel.
    pub optimize_wall_printing_order: bool,

    /// Print the outermost wall first and work inwards.
    pub outer_inset_first: bool,

    /// Seam placement strategy.
    pub z_seam_type: EZSeamType,

    /// Seam corner preference.
    pub z_seam_corner: EZSeamCornerPrefType,

    /// Seam hint X (mm).
    pub z_seam_x: CoordF,

    /// Seam hint Y (mm).
    pub z_seam_y: CoordF,

    /// Interpret the seam hint relative to the mesh bounding-box centre.
    pub z_seam_relative: bool,

    /// Wipe distance after the outer wall (mm).
    pub wall_0_wipe_dist: CoordF,

    /// Always retract before travelling to an outer wall.
    pub travel_retract_before_outer_wall: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            optimize_wall_printing_order: false,
            outer_inset_first: false,
            z_seam_type: EZSeamType::Shortest,
            z_seam_corner: EZSeamCornerPrefType::default(),
            z_seam_x: 0.0,
            z_seam_y: 300.0,
            z_seam_relative: false,
            wall_0_wipe_dist: 0.2,
            travel_retract_before_outer_wall: false,
        }
    }
}

impl MeshSettings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable/disable wall order optimization.
    pub fn optimize_wall_printing_order(mut self, enabled: bool) -> Self {
        self.optimize_wall_printing_order = enabled;
        self
    }

    /// Builder method: print outer walls before inner walls.
    pub fn outer_inset_first(mut self, enabled: bool) -> Self {
        self.outer_inset_first = enabled;
        self
    }

    /// Builder method: set the seam strategy and corner preference.
    pub fn z_seam(mut self, seam_type: EZSeamType, corner: EZSeamCornerPrefType) -> Self {
        self.z_seam_type = seam_type;
        self.z_seam_corner = corner;
        self
    }

    /// Builder method: set the seam hint position (mm).
    pub fn z_seam_position(mut self, x: CoordF, y: CoordF, relative: bool) -> Self {
        self.z_seam_x = x;
        self.z_seam_y = y;
        self.z_seam_relative = relative;
        self
    }

    /// Builder method: set the outer wall wipe distance (mm).
    pub fn wall_0_wipe_dist(mut self, dist: CoordF) -> Self {
        self.wall_0_wipe_dist = dist;
        self
    }

    /// Builder method: retract before every outer wall.
    pub fn travel_retract_before_outer_wall(mut self, enabled: bool) -> Self {
        self.travel_retract_before_outer_wall = enabled;
        self
    }

    /// Outer wall wipe distance in scaled units.
    pub fn wall_0_wipe_dist_scaled(&self) -> Coord {
        scale(self.wall_0_wipe_dist)
    }

    /// Load settings from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string. Missing keys take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn validate(&self) -> ConfigResult<()> {
        if !self.wall_0_wipe_dist.is_finite() || self.wall_0_wipe_dist < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "wall_0_wipe_dist must be a non-negative length, got {}",
                self.wall_0_wipe_dist
            )));
        }
        if !self.z_seam_x.is_finite() || !self.z_seam_y.is_finite() {
            return Err(ConfigError::Invalid(
                "z_seam_x and z_seam_y must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = MeshSettings::default();
        assert!(!settings.optimize_wall_printing_order);
        assert!(!settings.outer_inset_first);
        assert_eq!(settings.z_seam_type, EZSeamType::Shortest);
        assert_eq!(settings.wall_0_wipe_dist_scaled(), 200_000);
    }

    #[test]
    fn test_corner_preference_default() {
        assert_eq!(EZSeamCornerPrefType::default(), EZSeamCornerPrefType::Inner);
        assert_eq!(MeshSettings::default().z_seam_corner, EZSeamCornerPrefType::Inner);

        let settings = MeshSettings::from_json("{}").unwrap();
        assert_eq!(settings.z_seam_corner, EZSeamCornerPrefType::default());
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "outer_inset_first": true,
            "z_seam_type": "sharpest_corner",
            "z_seam_corner": "z_seam_corner_weighted"
        }"#;
        let settings = MeshSettings::from_json(json).unwrap();
        assert!(settings.outer_inset_first);
        assert_eq!(settings.z_seam_type, EZSeamType::SharpestCorner);
        assert_eq!(settings.z_seam_corner, EZSeamCornerPrefType::Weighted);
        assert_eq!(settings.z_seam_y, 300.0);
    }

    #[test]
    fn test_from_json_back_seam() {
        let settings = MeshSettings::from_json(r#"{"z_seam_type": "back"}"#).unwrap();
        assert_eq!(settings.z_seam_type, EZSeamType::UserSpecified);
        assert_eq!(settings.z_seam_type.to_string(), "back");
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            MeshSettings::from_json(r#"{"z_seam_type": "front"}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            MeshSettings::from_json(r#"{"wall_0_wipe_dist": -1.0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.json");

        let settings = MeshSettings::new()
            .optimize_wall_printing_order(true)
            .z_seam(EZSeamType::UserSpecified, EZSeamCornerPrefType::Any)
            .z_seam_position(10.0, -5.0, true)
            .travel_retract_before_outer_wall(true);
        settings.save_to_file(&path).unwrap();

        let loaded = MeshSettings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = MeshSettings::from_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
