//! Generation parameters and configuration presets

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Adjacency;
use crate::water::OutflowMode;

/// Parameters for sampling the elevation noise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightParams {
    /// Cells per unit of noise space (higher = larger features)
    pub scale: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            scale: 600.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Parameters for the rainfall and flow simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterParams {
    /// Number of rain + flow rounds
    pub iterations: usize,
    /// Rain drops deposited at the start of each round
    pub drops_per_iteration: usize,
    /// Water added by a single drop
    pub drop_volume: f64,
    /// How much water a cell gives away in one flow step
    pub outflow: OutflowMode,
    /// Which cells count as neighbors when water flows
    pub adjacency: Adjacency,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            iterations: 20,
            drops_per_iteration: 1000,
            drop_volume: 50.0,
            outflow: OutflowMode::ReplicateReference,
            adjacency: Adjacency::Cardinal,
        }
    }
}

/// Everything needed for one world generation run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    pub height: HeightParams,
    pub water: WaterParams,
}

impl WorldParams {
    /// Fewer rounds and drops, for quick previews and tests
    pub fn fast() -> Self {
        Self {
            water: WaterParams {
                iterations: 5,
                drops_per_iteration: 200,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Legacy flow behaviour: flat-index neighbors and unclamped outflow
    pub fn reference() -> Self {
        Self {
            water: WaterParams {
                outflow: OutflowMode::ReplicateReference,
                adjacency: Adjacency::FlatIndex,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Clamped outflow on strict four-connected neighbors
    pub fn conserving() -> Self {
        Self {
            water: WaterParams {
                outflow: OutflowMode::ClampToAvailable,
                adjacency: Adjacency::Cardinal,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Load parameters from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.height.scale.is_finite() && self.height.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "height.scale must be positive, got {}",
                self.height.scale
            )));
        }
        if self.height.octaves == 0 {
            return Err(ConfigError::Invalid("height.octaves must be at least 1".into()));
        }
        if !(self.water.drop_volume.is_finite() && self.water.drop_volume >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "water.drop_volume must be non-negative, got {}",
                self.water.drop_volume
            )));
        }
        Ok(())
    }
}
