//! Sliced part and mesh data read by wall ordering.
//!
//! A [`SliceLayerPart`] is one connected printable island of a mesh on one
//! layer, as handed over by the wall generator. [`SliceMeshStorage`] carries
//! the per-mesh settings and extents.

use crate::config::MeshSettings;
use crate::geometry::{BoundingBox, Point, Polygons};
use crate::perimeter::arachne::VariableWidthPaths;
use crate::{scale, Error, Result};

/// One printable part on one layer.
#[derive(Debug, Clone, Default)]
pub struct SliceLayerPart {
    /// Wall polygons per inset depth; `insets[0]` is the outermost wall set
    /// (contours counter-clockwise, holes clockwise).
    pub insets: Vec<Polygons>,

    /// Variable-width wall toolpaths of the part.
    pub wall_toolpaths: VariableWidthPaths,
}

impl SliceLayerPart {
    pub fn new(insets: Vec<Polygons>, wall_toolpaths: VariableWidthPaths) -> Self {
        Self {
            insets,
            wall_toolpaths,
        }
    }

    /// Build a part whose inset polygons are the closed toolpaths, by depth.
    pub fn from_toolpaths(wall_toolpaths: VariableWidthPaths) -> Self {
        let insets = insets_from_toolpaths(&wall_toolpaths);
        Self {
            insets,
            wall_toolpaths,
        }
    }

    /// Check if the part has no wall toolpaths at all.
    pub fn is_empty(&self) -> bool {
        self.wall_toolpaths.iter().all(|lines| lines.is_empty())
    }

    /// The outermost wall polygons, if any.
    pub fn outer_insets(&self) -> Option<&Polygons> {
        self.insets.first()
    }

    /// Check that the outer wall polygons can be used to move inside the part.
    ///
    /// Every polygon needs at least three points, and a non-empty set needs a
    /// counter-clockwise contour.
    pub fn validate(&self) -> Result<()> {
        let Some(outer) = self.outer_insets() else {
            return Ok(());
        };
        if let Some(degenerate) = outer.iter().find(|p| p.len() < 3) {
            return Err(Error::Geometry(format!(
                "outer wall polygon with {} points",
                degenerate.len()
            )));
        }
        if !outer.is_empty() && !outer.iter().any(|p| p.is_counter_clockwise()) {
            return Err(Error::Geometry(
                "outer wall has no counter-clockwise contour".to_string(),
            ));
        }
        Ok(())
    }
}

/// Collect closed toolpaths with at least three junctions into polygons per
/// inset depth.
pub fn insets_from_toolpaths(toolpaths: &VariableWidthPaths) -> Vec<Polygons> {
    let mut insets: Vec<Polygons> = Vec::new();
    for line in toolpaths.iter().flatten() {
        if !line.is_closed || line.len() < 3 {
            continue;
        }
        if insets.len() <= line.inset_idx {
            insets.resize_with(line.inset_idx + 1, Vec::new);
        }
        insets[line.inset_idx].push(line.to_polygon());
    }
    insets
}

/// Per-mesh data.
#[derive(Debug, Clone, Default)]
pub struct SliceMeshStorage {
    /// Mesh settings.
    pub settings: MeshSettings,

    /// XY extents of the mesh (scaled).
    pub bounding_box: BoundingBox,
}

impl SliceMeshStorage {
    pub fn new(settings: MeshSettings, bounding_box: BoundingBox) -> Self {
        Self {
            settings,
            bounding_box,
        }
    }

    /// Seam location hint (scaled).
    ///
    /// With `z_seam_relative` the configured position is an offset from the
    /// centre of the mesh bounding box.
    pub fn z_seam_hint(&self) -> Point {
        let hint = Point::new(
            scale(self.settings.z_seam_x),
            scale(self.settings.z_seam_y),
        );
        if self.settings.z_seam_relative && self.bounding_box.is_defined() {
            self.bounding_box.center() + hint
        } else {
            hint
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::perimeter::arachne::ExtrusionLine;

    #[test]
    fn test_z_seam_hint_absolute() {
        let settings = MeshSettings::new().z_seam_position(10.0, 20.0, false);
        let mesh = SliceMeshStorage::new(
            settings,
            BoundingBox::from_points_minmax(Point::zero(), Point::new_scale(100.0, 100.0)),
        );
        assert_eq!(mesh.z_seam_hint(), Point::new_scale(10.0, 20.0));
    }

    #[test]
    fn test_z_seam_hint_relative() {
        let settings = MeshSettings::new().z_seam_position(10.0, 20.0, true);
        let mesh = SliceMeshStorage::new(
            settings,
            BoundingBox::from_points_minmax(Point::zero(), Point::new_scale(100.0, 100.0)),
        );
        assert_eq!(mesh.z_seam_hint(), Point::new_scale(60.0, 70.0));
    }

    #[test]
    fn test_from_toolpaths() {
        let outer = Polygon::rectangle(Point::zero(), Point::new_scale(10.0, 10.0));
        let inner = Polygon::rectangle(Point::new_scale(1.0, 1.0), Point::new_scale(9.0, 9.0));
        let toolpaths = vec![
            vec![ExtrusionLine::from_polygon(&outer, scale(0.4), 0)],
            vec![],
            vec![
                ExtrusionLine::from_polygon(&inner, scale(0.4), 2),
                ExtrusionLine::from_points(&[Point::zero(), Point::new(5, 5)], scale(0.4), 2),
            ],
        ];

        let part = SliceLayerPart::from_toolpaths(toolpaths);
        assert!(!part.is_empty());
        assert_eq!(part.insets.len(), 3);
        assert_eq!(part.insets[0].len(), 1);
        assert!(part.insets[1].is_empty());
        assert_eq!(part.insets[2].len(), 1);
        assert_eq!(part.outer_insets().map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_validate() {
        let square = Polygon::rectangle(Point::zero(), Point::new_scale(10.0, 10.0));
        assert!(SliceLayerPart::default().validate().is_ok());
        assert!(SliceLayerPart::new(vec![vec![square.clone()]], vec![])
            .validate()
            .is_ok());

        let clockwise_only = SliceLayerPart::new(vec![vec![square.reversed()]], vec![]);
        assert!(matches!(clockwise_only.validate(), Err(Error::Geometry(_))));

        let degenerate = SliceLayerPart::new(
            vec![vec![square, Polygon::from_points(vec![Point::zero()])]],
            vec![],
        );
        assert!(matches!(degenerate.validate(), Err(Error::Geometry(_))));
    }

    #[test]
    fn test_empty_part() {
        let part = SliceLayerPart::new(Vec::new(), vec![vec![], vec![]]);
        assert!(part.is_empty());
        assert!(part.outer_insets().is_none());
    }
}
