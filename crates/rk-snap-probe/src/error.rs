//! Probe error types

use std::path::PathBuf;

use rk_snap::{MeshError, SnapError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scene: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("Snapping failed: {0}")]
    Snap(#[from] SnapError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Usage: rk-snap-probe <scene.ron> [--save-config] [--reset-config]")]
    Usage,
}

pub type ProbeResult<T> = Result<T, ProbeError>;
