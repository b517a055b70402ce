//! Seam configuration and start vertex selection for closed wall loops.

use crate::config::{EZSeamCornerPrefType, EZSeamType};
use crate::geometry::Point;
use std::collections::hash_map::DefaultHasher;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

/// Corner scores closer than this are considered equally sharp.
const CORNER_SCORE_EPSILON: f64 = 0.01;

/// Seam placement settings for one wall emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZSeamConfig {
    /// Placement strategy.
    pub seam_type: EZSeamType,
    /// Location hint (scaled), used by `UserSpecified` and as the tie-breaker
    /// for `SharpestCorner`.
    pub pos: Point,
    /// Corner preference for `SharpestCorner`.
    pub corner_pref: EZSeamCornerPrefType,
}

impl Default for ZSeamConfig {
    fn default() -> Self {
        Self::new(
            EZSeamType::default(),
            Point::zero(),
            EZSeamCornerPrefType::default(),
        )
    }
}

impl ZSeamConfig {
    pub fn new(seam_type: EZSeamType, pos: Point, corner_pref: EZSeamCornerPrefType) -> Self {
        Self {
            seam_type,
            pos,
            corner_pref,
        }
    }

    /// Pick the vertex a closed loop should start from.
    ///
    /// `from` is the nozzle position before travelling to the loop. Returns
    /// `None` only for an empty loop.
    pub fn find_start_index(&self, points: &[Point], from: Point) -> Option<usize> {
        if points.is_empty() {
            return None;
        }

        let index = match self.seam_type {
            EZSeamType::Shortest => from.nearest_point_index(points)?,
            EZSeamType::UserSpecified => self.pos.nearest_point_index(points)?,
            EZSeamType::Random => random_index(points),
            EZSeamType::SharpestCorner => self.sharpest_corner_index(points),
        };
        Some(index)
    }

    fn sharpest_corner_index(&self, points: &[Point]) -> usize {
        if points.len() < 3 || self.corner_pref == EZSeamCornerPrefType::None {
            return self.pos.nearest_point_index(points).unwrap_or(0);
        }

        let n = points.len();
        let mut best_idx = 0;
        let mut best_score = f64::MAX;
        let mut best_dist2 = i128::MAX;

        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let here = points[i];
            let next = points[(i + 1) % n];

            let score = corner_score(self.corner_pref, turn_angle(prev, here, next) / PI);
            let dist2 = here.distance_squared(&self.pos);

            let sharper = score < best_score - CORNER_SCORE_EPSILON;
            let as_sharp = (score - best_score).abs() <= CORNER_SCORE_EPSILON;
            if sharper || (as_sharp && dist2 < best_dist2) {
                best_idx = i;
                best_score = score;
                best_dist2 = dist2;
            }
        }

        best_idx
    }
}

/// Signed turn at `here` in radians, positive for a left turn.
///
/// Walls keep material on their left (contours counter-clockwise, holes
/// clockwise), so a left turn is a convex corner of the part.
fn turn_angle(prev: Point, here: Point, next: Point) -> f64 {
    let v1 = here - prev;
    let v2 = next - here;
    let cross = v1.x as f64 * v2.y as f64 - v1.y as f64 * v2.x as f64;
    let dot = v1.x as f64 * v2.x as f64 + v1.y as f64 * v2.y as f64;
    cross.atan2(dot)
}

/// Lower is better. `angle` is the turn normalized to (-1, 1).
fn corner_score(pref: EZSeamCornerPrefType, angle: f64) -> f64 {
    match pref {
        EZSeamCornerPrefType::None => 0.0,
        EZSeamCornerPrefType::Inner => angle.min(0.0),
        EZSeamCornerPrefType::Outer => -angle.max(0.0),
        EZSeamCornerPrefType::Any => -angle.abs(),
        EZSeamCornerPrefType::Weighted => {
            if angle < 0.0 {
                angle
            } else {
                -angle * 0.5
            }
        }
    }
}

/// Stable pseudo-random vertex derived from the loop geometry.
fn random_index(points: &[Point]) -> usize {
    let mut hasher = DefaultHasher::new();
    points.hash(&mut hasher);
    (hasher.finish() % points.len() as u64) as usize
}

/// Rotate `len` indices so that `start` comes first.
pub(crate) fn rotated_indices(len: usize, start: usize) -> impl Iterator<Item = usize> {
    (0..len).map(move |i| (start + i) % len)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// L-shaped loop (CCW) with one concave corner at (5, 5).
    fn l_shape() -> Vec<Point> {
        vec![
            Point::new_scale(0.0, 0.0),
            Point::new_scale(10.0, 0.0),
            Point::new_scale(10.0, 5.0),
            Point::new_scale(5.0, 5.0),
            Point::new_scale(5.0, 10.0),
            Point::new_scale(0.0, 10.0),
        ]
    }

    fn config(seam_type: EZSeamType, corner: EZSeamCornerPrefType) -> ZSeamConfig {
        ZSeamConfig::new(seam_type, Point::new_scale(0.0, 100.0), corner)
    }

    #[test]
    fn test_empty_loop() {
        let config = ZSeamConfig::default();
        assert_eq!(config.find_start_index(&[], Point::zero()), None);
    }

    #[test]
    fn test_default_matches_mesh_settings() {
        let settings = crate::config::MeshSettings::default();
        let config = ZSeamConfig::default();
        assert_eq!(config.seam_type, settings.z_seam_type);
        assert_eq!(config.corner_pref, settings.z_seam_corner);
    }

    #[test]
    fn test_shortest_uses_current_position() {
        let config = config(EZSeamType::Shortest, EZSeamCornerPrefType::None);
        let start = config.find_start_index(&l_shape(), Point::new_scale(11.0, -1.0));
        assert_eq!(start, Some(1));
    }

    #[test]
    fn test_user_specified_uses_hint() {
        let config = config(EZSeamType::UserSpecified, EZSeamCornerPrefType::None);
        let start = config.find_start_index(&l_shape(), Point::new_scale(11.0, -1.0));
        // (0, 10) is nearest to the hint at (0, 100); (5, 10) is as far up but further right
        assert_eq!(start, Some(5));
    }

    #[test]
    fn test_random_is_stable() {
        let config = config(EZSeamType::Random, EZSeamCornerPrefType::None);
        let a = config.find_start_index(&l_shape(), Point::zero());
        let b = config.find_start_index(&l_shape(), Point::new_scale(50.0, 50.0));
        assert_eq!(a, b);
        assert!(a.is_some_and(|i| i < 6));
    }

    #[test]
    fn test_sharpest_corner_inner() {
        let config = config(EZSeamType::SharpestCorner, EZSeamCornerPrefType::Inner);
        assert_eq!(config.find_start_index(&l_shape(), Point::zero()), Some(3));

        let config = config_with(EZSeamCornerPrefType::Weighted);
        assert_eq!(config.find_start_index(&l_shape(), Point::zero()), Some(3));
    }

    fn config_with(corner: EZSeamCornerPrefType) -> ZSeamConfig {
        config(EZSeamType::SharpestCorner, corner)
    }

    #[test]
    fn test_sharpest_corner_outer_breaks_ties_by_hint() {
        // five convex right angles; (0, 10) and (5, 10) are closest to the hint
        let start =
            config_with(EZSeamCornerPrefType::Outer).find_start_index(&l_shape(), Point::zero());
        assert_eq!(start, Some(5));
    }

    #[test]
    fn test_sharpest_corner_on_hole_orientation() {
        // the same outline as a clockwise hole: the notch becomes a convex corner
        let mut hole = l_shape();
        hole.reverse();
        let concave =
            config_with(EZSeamCornerPrefType::Inner).find_start_index(&hole, Point::zero());
        assert_ne!(concave.map(|i| hole[i]), Some(Point::new_scale(5.0, 5.0)));

        let convex =
            config_with(EZSeamCornerPrefType::Outer).find_start_index(&hole, Point::zero());
        assert_eq!(convex.map(|i| hole[i]), Some(Point::new_scale(5.0, 5.0)));
    }

    #[test]
    fn test_rotated_indices() {
        let order: Vec<usize> = rotated_indices(4, 2).collect();
        assert_eq!(order, vec![2, 3, 0, 1]);
    }
}
