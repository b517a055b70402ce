//! Polygon type for closed contours.
//!
//! A wall loop is converted to a `Polygon` whenever a geometric predicate is
//! needed (intersection, adjacency, containment); the width information is
//! dropped for that purpose.

use super::{BoundingBox, Point};
use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, Index};

/// A closed polygon defined by a sequence of points.
///
/// The polygon is implicitly closed - the last point connects back to the first.
/// Outer contours are counter-clockwise (positive area), holes clockwise.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Create a new empty polygon.
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a polygon from a vector of points.
    #[inline]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Get the points of this polygon.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Add a point to the polygon.
    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Iterate over the edges as `(start, end)` pairs, including the closing edge.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        let count = if n < 2 { 0 } else { n };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Signed area by the shoelace formula.
    /// Positive for counter-clockwise, negative for clockwise.
    pub fn signed_area(&self) -> CoordF {
        if self.points.len() < 3 {
            return 0.0;
        }

        let mut sum: i128 = 0;
        for (a, b) in self.segments() {
            sum += a.x as i128 * b.y as i128;
            sum -= b.x as i128 * a.y as i128;
        }

        sum as CoordF / 2.0
    }

    /// Unsigned area of the polygon.
    #[inline]
    pub fn area(&self) -> CoordF {
        self.signed_area().abs()
    }

    /// Check if the polygon is counter-clockwise (positive area).
    #[inline]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Check if the polygon is clockwise (negative area).
    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Ensure the polygon is counter-clockwise by reversing if necessary.
    pub fn make_counter_clockwise(&mut self) {
        if self.is_clockwise() {
            self.reverse();
        }
    }

    /// Ensure the polygon is clockwise by reversing if necessary.
    pub fn make_clockwise(&mut self) {
        if self.is_counter_clockwise() {
            self.reverse();
        }
    }

    /// Reverse the order of points in the polygon.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Return a reversed copy of the polygon.
    pub fn reversed(&self) -> Self {
        let mut result = self.clone();
        result.reverse();
        result
    }

    /// Get the bounding box of the polygon.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Check if a point is inside the polygon using the ray casting algorithm.
    pub fn contains_point(&self, p: &Point) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = self.points.len() - 1;

        for i in 0..self.points.len() {
            let pi = &self.points[i];
            let pj = &self.points[j];

            if ((pi.y > p.y) != (pj.y > p.y))
                && (p.x as i128)
                    < (pj.x as i128 - pi.x as i128) * (p.y as i128 - pi.y as i128)
                        / (pj.y as i128 - pi.y as i128)
                        + pi.x as i128
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Translate the polygon by a vector.
    pub fn translate(&mut self, v: Point) {
        for p in &mut self.points {
            *p += v;
        }
    }

    /// Create a rectangular polygon (counter-clockwise).
    pub fn rectangle(min: Point, max: Point) -> Self {
        Self::from_points(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    /// Create a square polygon centered at a point.
    pub fn square(center: Point, half_size: Coord) -> Self {
        Self::rectangle(
            Point::new(center.x - half_size, center.y - half_size),
            Point::new(center.x + half_size, center.y + half_size),
        )
    }

    /// Create a circle approximation with n segments (counter-clockwise).
    pub fn circle(center: Point, radius: Coord, segments: usize) -> Self {
        if segments < 3 {
            return Self::new();
        }

        (0..segments)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * i as CoordF / segments as CoordF;
                Point::new(
                    center.x + (radius as CoordF * angle.cos()).round() as Coord,
                    center.y + (radius as CoordF * angle.sin()).round() as Coord,
                )
            })
            .collect()
    }
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon({} points)", self.points.len())
    }
}

impl Deref for Polygon {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl Index<usize> for Polygon {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl FromIterator<Point> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Polygon {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(points)
    }
}

/// Type alias for a collection of polygons.
pub type Polygons = Vec<Polygon>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale;

    fn square_mm(min: f64, max: f64) -> Polygon {
        Polygon::rectangle(Point::new_scale(min, min), Point::new_scale(max, max))
    }

    #[test]
    fn test_polygon_area_and_orientation() {
        let mut poly = square_mm(0.0, 10.0);
        let area_mm2 = poly.area() / (crate::SCALING_FACTOR * crate::SCALING_FACTOR);
        assert!((area_mm2 - 100.0).abs() < 1e-6);
        assert!(poly.is_counter_clockwise());

        poly.make_clockwise();
        assert!(poly.is_clockwise());
        poly.make_counter_clockwise();
        assert!(poly.is_counter_clockwise());
    }

    #[test]
    fn test_polygon_segments_close_the_loop() {
        let poly = square_mm(0.0, 1.0);
        let segments: Vec<_> = poly.segments().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].1, poly[0]);
        assert_eq!(Polygon::from_points(vec![Point::zero()]).segments().count(), 0);
    }

    #[test]
    fn test_polygon_contains_point() {
        let poly = square_mm(0.0, 10.0);
        assert!(poly.contains_point(&Point::new_scale(5.0, 5.0)));
        assert!(!poly.contains_point(&Point::new_scale(15.0, 5.0)));
        assert!(!Polygon::new().contains_point(&Point::zero()));
    }

    #[test]
    fn test_polygon_circle() {
        let circle = Polygon::circle(Point::zero(), scale(5.0), 64);
        assert_eq!(circle.len(), 64);
        assert!(circle.is_counter_clockwise());
        assert!(circle.contains_point(&Point::zero()));
    }

    #[test]
    fn test_polygon_translate() {
        let mut poly = square_mm(0.0, 1.0);
        poly.translate(Point::new_scale(2.0, 3.0));
        assert_eq!(poly[0], Point::new_scale(2.0, 3.0));
    }
}
