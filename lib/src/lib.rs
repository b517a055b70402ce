//! # Inset Order
//!
//! Wall (inset) ordering and wall toolpath emission for one printable part on
//! one layer.
//!
//! Given the variable-width wall toolpaths of a part, this library decides the
//! sequence in which the walls are printed, primes the extruder, chooses the
//! seam configuration and emits the walls into a layer plan:
//! - Binning of wall contours by inset depth
//! - Outer-first / inner-first walking of the bins
//! - Nesting adjacency between walls of neighbouring depths
//! - Seam-safe repositioning inside the outer wall before a loop starts
//!
//! ## Example
//!
//! ```rust,ignore
//! use inset_order::{InsetOrderOptimizer, LayerPlan, MeshPathConfigs, SliceLayerPart, SliceMeshStorage};
//!
//! let mut plan = LayerPlan::new(0, Point::zero());
//! let mut optimizer = InsetOrderOptimizer::new(&mut plan, &mesh, 0, &path_configs, &part, 0);
//! let added_walls = optimizer.optimize();
//! ```

pub mod clipper;
pub mod config;
pub mod gcode;
pub mod geometry;
pub mod perimeter;
pub mod slice;

pub use config::{ConfigError, EZSeamCornerPrefType, EZSeamType, MeshSettings};
pub use gcode::{
    GCodePathConfig, LayerPlan, LayerPlanner, MeshPathConfigs, PlanCommand, PrintFeatureType,
    WallOptions, WallPath, ZSeamConfig,
};
pub use geometry::{BoundingBox, ExPolygon, ExPolygons, Point, PointF, Polygon, Polygons};
pub use perimeter::arachne::{
    ExtrusionJunction, ExtrusionJunctions, ExtrusionLine, VariableWidthLines, VariableWidthPaths,
};
pub use perimeter::inset_order::{
    adjacency_gap, find_adjacent_enclosing_poly, variable_width_path_to_bin_junctions,
    BinJunctions, IndexedOrder, InsetOrderOptimizer, InsetOrderPolicy, OptimizedOrder,
};
pub use slice::{SliceLayerPart, SliceMeshStorage};

/// Coordinate type used throughout the library.
/// Using i64 for integer coordinates (scaled by SCALING_FACTOR) to avoid floating-point issues.
pub type Coord = i64;

/// Floating-point coordinate type for unscaled values.
pub type CoordF = f64;

/// Scaling factor: coordinates are stored as integers scaled by this factor.
/// 1 unit = 1 nanometer, so 1mm = 1_000_000 units.
pub const SCALING_FACTOR: f64 = 1_000_000.0;

/// Scale a floating-point coordinate to integer.
#[inline]
pub fn scale(v: CoordF) -> Coord {
    (v * SCALING_FACTOR).round() as Coord
}

/// Unscale an integer coordinate to floating-point.
#[inline]
pub fn unscale(v: Coord) -> CoordF {
    v as CoordF / SCALING_FACTOR
}

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the fallible (configuration and IO) surface of the library.
///
/// Wall ordering itself never fails; degenerate input is skipped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid geometry: {0}")]
    Geometry(String),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
