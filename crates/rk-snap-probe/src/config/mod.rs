//! Probe configuration
//!
//! Persists the snap toggles and unit settings between runs so that scenes
//! only need to describe geometry.

mod manager;

pub use manager::{ConfigError, create_shared_config};

use rk_snap::{SnapSettings, UnitSettings};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// Config format version for migration
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub units: UnitSettings,
}

fn default_version() -> u32 {
    ProbeConfig::CURRENT_VERSION
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeConfig {
    /// Current config format version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            snap: SnapSettings::default(),
            units: UnitSettings::default(),
        }
    }
}
