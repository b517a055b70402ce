//! Configuration module for mesh settings.
//!
//! This module provides the typed settings the wall ordering stage reads for
//! a mesh, together with JSON loading and saving.

mod mesh_settings;

pub use mesh_settings::{EZSeamCornerPrefType, EZSeamType, MeshSettings};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
