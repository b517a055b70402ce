//! Perimeter (wall) module.
//!
//! Walls arrive from the wall generator as variable-width toolpaths
//! ([`arachne`]). This module decides in which order they are printed and
//! emits them into the layer plan ([`inset_order`]).
//!
//! # Overview
//!
//! - Outer walls (inset 0) are printed with the outer wall profile, wipe and
//!   optional retraction
//! - Inner walls (inset 1 and up) use the inner wall profile
//! - Outer-first or inner-first is a per-mesh setting

pub mod arachne;
pub mod inset_order;

pub use arachne::{
    ExtrusionJunction, ExtrusionJunctions, ExtrusionLine, VariableWidthLines, VariableWidthPaths,
};
pub use inset_order::{
    adjacency_gap, find_adjacent_enclosing_poly, variable_width_path_to_bin_junctions,
    BinJunctions, IndexedOrder, InsetOrderOptimizer, InsetOrderPolicy, OptimizedOrder,
};
