//! Layer planning surface for wall emission.
//!
//! This module provides the extrusion profiles, the seam configuration and
//! the layer plan that the wall ordering stage writes into.

mod layer_plan;
mod path_config;
mod seam;

pub use layer_plan::{LayerPlan, LayerPlanner, PlanCommand, WallOptions, WallPath};
pub use path_config::{GCodePathConfig, MeshPathConfigs, PrintFeatureType};
pub use seam::ZSeamConfig;
