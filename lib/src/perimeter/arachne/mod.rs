//! Variable-width wall toolpath types.
//!
//! The wall generator hands its output to the ordering stage as
//! [`VariableWidthPaths`]: groups of [`ExtrusionLine`]s whose vertices are
//! [`ExtrusionJunction`]s carrying a local line width.

pub mod junction;
pub mod line;

pub use junction::{ExtrusionJunction, ExtrusionJunctions};
pub use line::{ExtrusionLine, VariableWidthLines, VariableWidthPaths};
