//! Geometric predicates and point relocation over polygon sets.
//!
//! These are the primitives the wall ordering stage relies on: the squared
//! distance from a point to a segment, outline adjacency between two loops,
//! and moving a point a given distance inside a polygon set.

use super::{Point, Polygon};
use crate::{scale, Coord};

/// Squared distance from `p` to the segment `a`-`b`.
pub fn dist2_from_line_segment(a: Point, p: Point, b: Point) -> i128 {
    p.distance_squared(&p.project_onto_segment(a, b))
}

/// Check whether two loops run within `max_gap` of each other somewhere.
///
/// True when a vertex of `inset` lies strictly closer than `max_gap` to an edge
/// of `hole`. The expanded bounding boxes are compared first.
pub fn polygon_outlines_adjacent(inset: &Polygon, hole: &Polygon, max_gap: Coord) -> bool {
    let inset_bb = inset.bounding_box().expanded(max_gap);
    if !inset_bb.intersects(&hole.bounding_box()) {
        return false;
    }

    let max_gap2 = (max_gap as i128) * (max_gap as i128);
    hole.segments().any(|(a, b)| {
        inset
            .iter()
            .any(|&inset_point| dist2_from_line_segment(a, inset_point, b) < max_gap2)
    })
}

/// Move `from` to a point `distance` inside the polygon set.
///
/// The closest boundary location is found by projecting onto every edge; when
/// the closest location is a vertex, the step direction is the bisector of the
/// two adjacent edge normals. The inside is taken to be left of each edge, so
/// contours must be counter-clockwise and holes clockwise. A negative
/// `distance` moves outside instead.
///
/// A point already on the requested side and at least `distance` away from the
/// boundary is left where it is. Returns the index of the polygon whose
/// boundary was used, or `None` when the set has no usable edge.
pub fn move_inside(polygons: &[Polygon], from: &mut Point, distance: Coord) -> Option<usize> {
    let p = *from;
    let mut result = p;
    let mut best_dist2 = i128::MAX;
    let mut best_poly = None;
    let mut on_correct_side = false;

    for (poly_idx, poly) in polygons.iter().enumerate() {
        if poly.len() < 2 {
            continue;
        }

        let mut p0 = poly[poly.len() - 2];
        let mut p1 = poly[poly.len() - 1];
        let mut projected_beyond_prev_segment =
            (p1 - p0).dot(&(p - p0)) >= (p1 - p0).length_squared();

        for &p2 in poly.iter() {
            let ab = p2 - p1;
            let ap = p - p1;
            let ab_length2 = ab.length_squared();
            if ab_length2 <= 0 {
                // duplicate vertex
                p1 = p2;
                continue;
            }

            let dot_prod = ab.dot(&ap);
            if dot_prod <= 0 {
                // projects before ab; only the vertex p1 is a candidate, and only
                // when the previous edge projected beyond its end
                if projected_beyond_prev_segment {
                    let x = p1;
                    let dist2 = p.distance_squared(&x);
                    if dist2 < best_dist2 {
                        best_dist2 = dist2;
                        best_poly = Some(poly_idx);
                        if distance == 0 {
                            result = x;
                        } else {
                            let inward_dir =
                                (ab.normal(scale(10.0)) + (p1 - p0).normal(scale(10.0)))
                                    .rotate_90_ccw();
                            result = x + inward_dir.normal(distance);
                            on_correct_side = inward_dir.dot(&(p - x)) * distance as i128 >= 0;
                        }
                    }
                }
                projected_beyond_prev_segment = false;
            } else if dot_prod >= ab_length2 {
                projected_beyond_prev_segment = true;
            } else {
                projected_beyond_prev_segment = false;
                let x = p1
                    + Point::new(
                        (ab.x as i128 * dot_prod / ab_length2) as Coord,
                        (ab.y as i128 * dot_prod / ab_length2) as Coord,
                    );
                let dist2 = p.distance_squared(&x);
                if dist2 < best_dist2 {
                    best_dist2 = dist2;
                    best_poly = Some(poly_idx);
                    if distance == 0 {
                        result = x;
                    } else {
                        let inward_dir = ab.normal(distance).rotate_90_ccw();
                        result = x + inward_dir;
                        on_correct_side = inward_dir.dot(&(p - x)) >= 0;
                    }
                }
            }
            p0 = p1;
            p1 = p2;
        }
    }

    best_poly?;
    if on_correct_side {
        // already deep enough on the right side: leave the point alone
        if best_dist2 < (distance as i128) * (distance as i128) {
            *from = result;
        }
    } else {
        *from = result;
    }
    best_poly
}
