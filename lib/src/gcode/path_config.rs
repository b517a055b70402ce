//! Extrusion profiles for wall paths.
//!
//! A [`GCodePathConfig`] bundles what the planner needs to extrude one kind of
//! path: line width, layer thickness, speed and flow. [`MeshPathConfigs`]
//! holds the four wall profiles of a mesh (outer and inner wall, each with a
//! bridging variant).

use crate::{scale, unscale, Coord, CoordF};

/// The printed feature a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrintFeatureType {
    /// The outermost wall (inset 0).
    OuterWall,
    /// Any wall inside the outer wall.
    InnerWall,
}

impl PrintFeatureType {
    /// Get a descriptive name for this feature.
    pub fn name(&self) -> &'static str {
        match self {
            PrintFeatureType::OuterWall => "outer wall",
            PrintFeatureType::InnerWall => "inner wall",
        }
    }

    /// Get the feature name used in `; FEATURE: <name>` G-code comments.
    pub fn feature_name(&self) -> &'static str {
        match self {
            PrintFeatureType::OuterWall => "Outer wall",
            PrintFeatureType::InnerWall => "Inner wall",
        }
    }
}

/// Extrusion profile for one kind of path.
#[derive(Debug, Clone, PartialEq)]
pub struct GCodePathConfig {
    /// Feature the profile prints.
    pub feature: PrintFeatureType,

    /// Nominal line width (scaled).
    pub line_width: Coord,

    /// Layer thickness (scaled).
    pub layer_thickness: Coord,

    /// Print speed (mm/s).
    pub speed: CoordF,

    /// Flow multiplier (1.0 = nominal).
    pub flow: CoordF,
}

impl GCodePathConfig {
    /// Create a profile with nominal flow.
    pub fn new(
        feature: PrintFeatureType,
        line_width: Coord,
        layer_thickness: Coord,
        speed: CoordF,
    ) -> Self {
        Self {
            feature,
            line_width,
            layer_thickness,
            speed,
            flow: 1.0,
        }
    }

    /// Builder method: set the flow multiplier.
    pub fn with_flow(mut self, flow: CoordF) -> Self {
        self.flow = flow;
        self
    }

    /// Builder method: set the speed (mm/s).
    pub fn with_speed(mut self, speed: CoordF) -> Self {
        self.speed = speed;
        self
    }

    /// Nominal line width in scaled units.
    #[inline]
    pub fn line_width(&self) -> Coord {
        self.line_width
    }

    /// Extruded volume per millimetre of travel (mm³/mm), rectangular section.
    pub fn mm3_per_mm(&self) -> CoordF {
        unscale(self.line_width) * unscale(self.layer_thickness) * self.flow
    }
}

/// The wall profiles of one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPathConfigs {
    /// Outer wall.
    pub inset0_config: GCodePathConfig,
    /// Inner walls.
    pub inset_x_config: GCodePathConfig,
    /// Outer wall segments printed over air.
    pub bridge_inset0_config: GCodePathConfig,
    /// Inner wall segments printed over air.
    pub bridge_inset_x_config: GCodePathConfig,
}

impl MeshPathConfigs {
    /// Build wall profiles from widths (mm), layer height (mm) and speeds (mm/s).
    ///
    /// Bridge variants reuse the widths with the bridge speed.
    pub fn new(
        outer_width: CoordF,
        inner_width: CoordF,
        layer_height: CoordF,
        outer_speed: CoordF,
        inner_speed: CoordF,
        bridge_speed: CoordF,
    ) -> Self {
        let outer = GCodePathConfig::new(
            PrintFeatureType::OuterWall,
            scale(outer_width),
            scale(layer_height),
            outer_speed,
        );
        let inner = GCodePathConfig::new(
            PrintFeatureType::InnerWall,
            scale(inner_width),
            scale(layer_height),
            inner_speed,
        );
        Self {
            bridge_inset0_config: outer.clone().with_speed(bridge_speed),
            bridge_inset_x_config: inner.clone().with_speed(bridge_speed),
            inset0_config: outer,
            inset_x_config: inner,
        }
    }

    /// The larger of the outer and inner wall widths (scaled).
    pub fn max_wall_line_width(&self) -> Coord {
        self.inset0_config
            .line_width()
            .max(self.inset_x_config.line_width())
    }
}

impl Default for MeshPathConfigs {
    fn default() -> Self {
        Self::new(0.4, 0.45, 0.2, 25.0, 45.0, 15.0)
    }
}
