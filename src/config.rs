use anyhow::Context;
use ::config::{Config, ConfigError, Environment, File, FileFormat};
use hotspot_grid::{ClusterError, ClusterParams};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "HOTSPOT";

/// Clustering parameters as they appear in the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    pub cell_size: f64,
    pub threshold: usize,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self { cell_size: 50.0, threshold: 100 }
    }
}

impl ClusterSettings {
    pub fn params(&self) -> Result<ClusterParams, ClusterError> {
        ClusterParams::new(self.cell_size, self.threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub enabled: bool,
    pub update_interval_ms: u64,
    /// Stop after this many ticks. 0 runs until interrupted.
    pub max_ticks: u64,
    pub topic_capacity: usize,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval_ms: 150,
            max_ticks: 0,
            topic_capacity: 16,
        }
    }
}

impl DetectorSettings {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.max(1))
    }
}

/// Shape of the synthetic snapshot generated by `ScatterSource`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub seed: u64,
    /// Side length of the square area entities are scattered over.
    pub extent: f64,
    pub noise_points: usize,
    pub blobs: usize,
    pub blob_points: usize,
    pub blob_radius: f64,
    /// Maximum distance a blob center moves per sample.
    pub drift: f64,
    /// Fraction of entities reported without a position.
    pub missing_ratio: f64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            seed: 7,
            extent: 2000.0,
            noise_points: 1500,
            blobs: 3,
            blob_points: 250,
            blob_radius: 40.0,
            drift: 5.0,
            missing_ratio: 0.01,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cluster: ClusterSettings,
    pub detector: DetectorSettings,
    pub source: SourceSettings,
}

/// Loads settings from `path` (optional) layered under `HOTSPOT__*` environment overrides.
pub fn load_settings(path: &str) -> anyhow::Result<Settings> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(environment())
        .build()
        .and_then(from_config);

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e).with_context(|| format!("loading configuration from {}", path))
        }
    }
}

/// `HOTSPOT__CLUSTER__THRESHOLD=50` overrides `cluster.threshold`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true)
}

fn from_config(config: Config) -> Result<Settings, ConfigError> {
    config.try_deserialize::<Settings>()
}
