//! Extrusion line for variable-width walls.
//!
//! An `ExtrusionLine` is one continuous wall toolpath (a closed loop or an
//! open path) at a single inset depth.

use super::junction::ExtrusionJunction;
use crate::geometry::{Point, Polygon};
use crate::{Coord, CoordF};

/// A variable-width wall toolpath (polyline with a width at each vertex).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionLine {
    /// The junctions (vertices with width) along this path.
    pub junctions: Vec<ExtrusionJunction>,

    /// Which inset this line belongs to (0 = outer wall).
    pub inset_idx: usize,

    /// Whether this is an "odd" wall in a thin section: the single centre wall
    /// that has no partner on the other side.
    pub is_odd: bool,

    /// Whether this path forms a closed loop.
    pub is_closed: bool,
}

impl ExtrusionLine {
    /// Create a new empty extrusion line.
    pub fn new(inset_idx: usize, is_odd: bool, is_closed: bool) -> Self {
        Self {
            junctions: Vec::new(),
            inset_idx,
            is_odd,
            is_closed,
        }
    }

    /// Create an empty closed loop.
    pub fn closed(inset_idx: usize) -> Self {
        Self::new(inset_idx, false, true)
    }

    /// Create an empty open line.
    pub fn open(inset_idx: usize) -> Self {
        Self::new(inset_idx, false, false)
    }

    /// Create a constant-width closed loop from a polygon.
    pub fn from_polygon(polygon: &Polygon, width: Coord, inset_idx: usize) -> Self {
        let junctions = polygon
            .points()
            .iter()
            .map(|p| ExtrusionJunction::new(*p, width, inset_idx))
            .collect();

        Self {
            junctions,
            inset_idx,
            is_odd: false,
            is_closed: true,
        }
    }

    /// Create a constant-width open line through the given points.
    pub fn from_points(points: &[Point], width: Coord, inset_idx: usize) -> Self {
        Self {
            junctions: points
                .iter()
                .map(|p| ExtrusionJunction::new(*p, width, inset_idx))
                .collect(),
            inset_idx,
            is_odd: false,
            is_closed: false,
        }
    }

    /// Check if the line is empty (no junctions).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty()
    }

    /// Get the number of junctions.
    #[inline]
    pub fn len(&self) -> usize {
        self.junctions.len()
    }

    /// Add a junction to the end of the line.
    pub fn push(&mut self, junction: ExtrusionJunction) {
        self.junctions.push(junction);
    }

    /// Total length in scaled units, including the closing segment of loops.
    pub fn length(&self) -> CoordF {
        let open: CoordF = self
            .junctions
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum();

        match (self.is_closed, self.junctions.first(), self.junctions.last()) {
            (true, Some(first), Some(last)) if self.junctions.len() >= 2 => {
                open + last.distance_to(first)
            }
            _ => open,
        }
    }

    /// Check if this line is on the outermost wall.
    pub fn is_external(&self) -> bool {
        self.inset_idx == 0
    }

    /// Convert to a polygon (loses width information).
    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_points(self.points())
    }

    /// Get just the positions of the junctions.
    pub fn points(&self) -> Vec<Point> {
        self.junctions.iter().map(|j| j.position).collect()
    }

    /// Iterator over junctions.
    pub fn iter(&self) -> impl Iterator<Item = &ExtrusionJunction> {
        self.junctions.iter()
    }
}

impl<'a> IntoIterator for &'a ExtrusionLine {
    type Item = &'a ExtrusionJunction;
    type IntoIter = std::slice::Iter<'a, ExtrusionJunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.junctions.iter()
    }
}

/// The lines of one contiguous toolpath group.
pub type VariableWidthLines = Vec<ExtrusionLine>;

/// All toolpath groups of one part on one layer.
pub type VariableWidthPaths = Vec<VariableWidthLines>;
