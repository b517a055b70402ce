//! Clipper polygon operations module.
//!
//! Offsets and intersection tests backed by the geo-clipper library. The wall
//! ordering stage needs two of them:
//! - inward offsetting of the outer wall to obtain the retraction region
//! - area intersection between two wall loops for nesting detection
//!
//! Coordinates are handed to Clipper in millimetres with a precision factor of
//! 1000 (one micron).

use crate::geometry::{ExPolygon, ExPolygons, Point, Polygon};
use crate::{unscale, CoordF};
use geo::{Area, Coord as GeoCoord, LineString, MultiPolygon, Polygon as GeoPolygon};
use geo_clipper::{Clipper, EndType, JoinType};

/// Precision factor passed to geo-clipper (mm -> micron integer grid).
const CLIPPER_FACTOR: f64 = 1000.0;

/// Join type for offset corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetJoinType {
    /// Square corners
    Square,
    /// Round corners
    Round,
    /// Mitered corners
    #[default]
    Miter,
}

impl From<OffsetJoinType> for JoinType {
    fn from(jt: OffsetJoinType) -> Self {
        match jt {
            OffsetJoinType::Square => JoinType::Square,
            OffsetJoinType::Round => JoinType::Round(0.25),
            OffsetJoinType::Miter => JoinType::Miter(1.2),
        }
    }
}

fn ring_to_geo(poly: &Polygon) -> LineString<f64> {
    let mut ring: Vec<GeoCoord<f64>> = poly
        .points()
        .iter()
        .map(|p| GeoCoord {
            x: unscale(p.x),
            y: unscale(p.y),
        })
        .collect();

    // Close the ring if needed
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(*first);
        }
    }
    LineString::new(ring)
}

fn geo_to_ring(ring: &LineString<f64>) -> Polygon {
    let mut points: Vec<Point> = ring
        .coords()
        .map(|c| Point::new(crate::scale(c.x), crate::scale(c.y)))
        .collect();

    // Our Polygon doesn't store the closing point
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Polygon::from_points(points)
}

fn expolygon_to_geo(expoly: &ExPolygon) -> GeoPolygon<f64> {
    GeoPolygon::new(
        ring_to_geo(&expoly.contour),
        expoly.holes.iter().map(ring_to_geo).collect(),
    )
}

fn geo_to_expolygon(geo_poly: &GeoPolygon<f64>) -> ExPolygon {
    let mut expoly = ExPolygon::with_holes(
        geo_to_ring(geo_poly.exterior()),
        geo_poly.interiors().iter().map(geo_to_ring).collect(),
    );
    expoly.make_canonical();
    expoly
}

fn geo_multi_to_expolygons(multi: &MultiPolygon<f64>) -> ExPolygons {
    multi
        .0
        .iter()
        .map(geo_to_expolygon)
        .filter(|expoly| expoly.contour.len() >= 3)
        .collect()
}

/// Group a loose set of loops into ExPolygons by nesting depth.
///
/// A loop enclosed by an even number of other loops is a contour; a loop
/// enclosed by an odd number is a hole of the smallest contour around it. The
/// input orientation is ignored and the output is canonical.
pub fn group_polygons(polygons: &[Polygon]) -> ExPolygons {
    let loops: Vec<&Polygon> = polygons.iter().filter(|p| p.len() >= 3).collect();
    let encloses = |outer: &Polygon, inner: &Polygon| {
        outer.area() > inner.area() && outer.contains_point(&inner[0])
    };

    let depths: Vec<usize> = loops
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            loops
                .iter()
                .enumerate()
                .filter(|(j, outer)| *j != i && encloses(outer, inner))
                .count()
        })
        .collect();

    let mut contour_ids: Vec<usize> = Vec::new();
    let mut result: ExPolygons = Vec::new();
    for (i, poly) in loops.iter().enumerate() {
        if depths[i] % 2 == 0 {
            contour_ids.push(i);
            result.push(ExPolygon::new((*poly).clone()));
        }
    }

    for (i, hole) in loops.iter().enumerate() {
        if depths[i] % 2 == 0 {
            continue;
        }
        let mut parent: Option<usize> = None;
        for (slot, &c) in contour_ids.iter().enumerate() {
            if depths[c] + 1 != depths[i] || !encloses(loops[c], hole) {
                continue;
            }
            let smaller =
                parent.map_or(true, |best| loops[c].area() < loops[contour_ids[best]].area());
            if smaller {
                parent = Some(slot);
            }
        }
        if let Some(slot) = parent {
            result[slot].holes.push((*hole).clone());
        }
    }

    for expoly in &mut result {
        expoly.make_canonical();
    }
    result
}

/// Offset ExPolygons by a distance in mm (positive grows, negative shrinks).
pub fn offset_expolygons(
    expolygons: &[ExPolygon],
    delta: CoordF,
    join_type: OffsetJoinType,
) -> ExPolygons {
    if expolygons.is_empty() {
        return vec![];
    }

    let geo_multi = MultiPolygon::new(expolygons.iter().map(expolygon_to_geo).collect());
    let result = geo_multi.offset(
        delta,
        join_type.into(),
        EndType::ClosedPolygon,
        CLIPPER_FACTOR,
    );
    geo_multi_to_expolygons(&result)
}

/// Offset a loose set of loops (contours and holes) by a distance in mm.
///
/// The loops are grouped with [`group_polygons`] first so that a negative
/// delta shrinks contours and grows holes.
pub fn offset_polygons(
    polygons: &[Polygon],
    delta: CoordF,
    join_type: OffsetJoinType,
) -> ExPolygons {
    offset_expolygons(&group_polygons(polygons), delta, join_type)
}

/// Check whether the areas of two loops overlap.
///
/// Bounding boxes are compared first; only overlapping boxes pay for the
/// Clipper intersection. Touching without shared area does not count.
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    if a.len() < 3 || b.len() < 3 || !a.bounding_box().intersects(&b.bounding_box()) {
        return false;
    }

    let mut a = a.clone();
    let mut b = b.clone();
    a.make_counter_clockwise();
    b.make_counter_clockwise();

    let geo_a = GeoPolygon::new(ring_to_geo(&a), vec![]);
    let geo_b = GeoPolygon::new(ring_to_geo(&b), vec![]);
    let overlap = geo_a.intersection(&geo_b, CLIPPER_FACTOR);
    overlap.0.iter().any(|p| p.unsigned_area() > 0.0)
}

/// Compute the total area of a set of ExPolygons (scaled units squared).
pub fn total_area(expolygons: &[ExPolygon]) -> CoordF {
    expolygons.iter().map(|p| p.area()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mm(min: f64, max: f64) -> Polygon {
        Polygon::rectangle(Point::new_scale(min, min), Point::new_scale(max, max))
    }

    fn mm2(area: CoordF) -> CoordF {
        area / (crate::SCALING_FACTOR * crate::SCALING_FACTOR)
    }

    #[test]
    fn test_group_polygons_with_hole() {
        // hole given counter-clockwise on purpose
        let grouped = group_polygons(&[square_mm(5.0, 15.0), square_mm(0.0, 20.0)]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].holes.len(), 1);
        assert!(grouped[0].contour.is_counter_clockwise());
        assert!(grouped[0].holes[0].is_clockwise());
    }

    #[test]
    fn test_group_polygons_island_in_hole() {
        let grouped = group_polygons(&[
            square_mm(0.0, 30.0),
            square_mm(5.0, 25.0),
            square_mm(10.0, 20.0),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.iter().map(|e| e.holes.len()).sum::<usize>(), 1);
    }

    #[test]
    fn test_offset_polygons_shrink() {
        let shrunk = offset_polygons(&[square_mm(0.0, 10.0)], -1.0, OffsetJoinType::Miter);
        assert_eq!(shrunk.len(), 1);
        assert!((mm2(total_area(&shrunk)) - 64.0).abs() < 0.1);
    }

    #[test]
    fn test_offset_polygons_grows_hole() {
        let shrunk = offset_polygons(
            &[square_mm(0.0, 20.0), square_mm(5.0, 15.0)],
            -1.0,
            OffsetJoinType::Miter,
        );
        // 18x18 contour minus a 12x12 hole whose corners are squared off
        let area = mm2(total_area(&shrunk));
        assert!(area > 179.5 && area < 181.5);
    }

    #[test]
    fn test_offset_polygons_vanishes() {
        let shrunk = offset_polygons(&[square_mm(0.0, 1.0)], -1.0, OffsetJoinType::Miter);
        assert!(shrunk.is_empty());
        assert!(offset_polygons(&[], -1.0, OffsetJoinType::Miter).is_empty());
    }

    #[test]
    fn test_polygons_intersect() {
        let outer = square_mm(0.0, 10.0);
        let inner = square_mm(2.0, 8.0);
        let far = square_mm(20.0, 30.0);
        assert!(polygons_intersect(&outer, &inner));
        assert!(polygons_intersect(&inner, &outer.reversed()));
        assert!(!polygons_intersect(&outer, &far));
    }
}
