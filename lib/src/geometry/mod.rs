//! Geometry primitives.
//!
//! - [`Point`] / [`PointF`] - scaled integer and millimetre points
//! - [`BoundingBox`] - axis-aligned bounds used as prefilters
//! - [`Polygon`] / [`ExPolygon`] - closed loops and loops with holes
//! - [`polygon_utils`] - move-inside and outline adjacency predicates

mod bounding_box;
mod expolygon;
mod point;
mod polygon;
pub mod polygon_utils;

pub use bounding_box::BoundingBox;
pub use expolygon::{expolygons_contain_point, ExPolygon, ExPolygons};
pub use point::{Point, PointF};
pub use polygon::{Polygon, Polygons};
