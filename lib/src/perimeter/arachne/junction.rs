//! Extrusion junction for variable-width walls.
//!
//! A junction is one vertex of a wall toolpath as delivered by the wall
//! generator: a centerline position, the local line width there, and the
//! inset the vertex belongs to. Junctions are never modified by the ordering
//! stage, only regrouped and copied.

use crate::geometry::Point;
use crate::{unscale, Coord, CoordF};

/// A junction (vertex) in a variable-width wall toolpath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionJunction {
    /// The position of the centerline at this junction (in scaled coordinates).
    pub position: Point,

    /// The extrusion width at this junction (in scaled coordinates).
    pub width: Coord,

    /// Which perimeter/wall index this junction belongs to.
    /// Perimeters are counted from outside inwards (0 = outermost wall).
    pub perimeter_index: usize,
}

impl ExtrusionJunction {
    /// Create a new extrusion junction.
    pub fn new(position: Point, width: Coord, perimeter_index: usize) -> Self {
        Self {
            position,
            width,
            perimeter_index,
        }
    }

    /// Get the extrusion width in millimeters.
    #[inline]
    pub fn width_mm(&self) -> CoordF {
        unscale(self.width)
    }

    /// Calculate the distance to another junction (scaled units).
    pub fn distance_to(&self, other: &ExtrusionJunction) -> CoordF {
        self.position.distance(&other.position)
    }

    /// Check if this junction lies on the outermost wall.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.perimeter_index == 0
    }
}

impl From<(Point, Coord, usize)> for ExtrusionJunction {
    fn from((position, width, perimeter_index): (Point, Coord, usize)) -> Self {
        Self::new(position, width, perimeter_index)
    }
}

/// One wall contour flattened to its junctions.
pub type ExtrusionJunctions = Vec<ExtrusionJunction>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale;

    #[test]
    fn test_junction_new() {
        let j = ExtrusionJunction::new(Point::new_scale(10.0, 20.0), scale(0.45), 0);
        assert_eq!(j.position, Point::new_scale(10.0, 20.0));
        assert!((j.width_mm() - 0.45).abs() < 1e-9);
        assert!(j.is_external());
    }

    #[test]
    fn test_junction_distance() {
        let j1 = ExtrusionJunction::new(Point::new(0, 0), scale(0.4), 1);
        let j2 = ExtrusionJunction::new(Point::new_scale(3.0, 4.0), scale(0.4), 1);
        assert!((unscale(j1.distance_to(&j2) as Coord) - 5.0).abs() < 1e-6);
        assert!(!j1.is_external());
    }

    #[test]
    fn test_junction_from_tuple() {
        let j: ExtrusionJunction = (Point::new(100, 200), 450_000, 2).into();
        assert_eq!(j.position, Point::new(100, 200));
        assert_eq!(j.width, 450_000);
        assert_eq!(j.perimeter_index, 2);
    }
}
