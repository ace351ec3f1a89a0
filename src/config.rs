use crate::{
    error::PredictionError,
    prediction::{Hyperparameters, ModelKind},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wizard: Wizard,
    #[serde(default)]
    pub images: Images,
    #[serde(default)]
    pub prediction: Prediction,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wizard {
    pub geolocation_delay_ms: u64,
    pub submit_delay_ms: u64,
    pub simulated_coordinates: String,
    pub locating_placeholder: String,
}
impl Default for Wizard {
    fn default() -> Self {
        Self {
            geolocation_delay_ms: 1000,
            submit_delay_ms: 1500,
            simulated_coordinates: "34.0522° N, 118.2437° W".into(),
            locating_placeholder: "Using current location...".into(),
        }
    }
}

impl Wizard {
    pub fn geolocation_delay(&self) -> Duration {
        Duration::from_millis(self.geolocation_delay_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Images {
    pub max_bytes: u64,
    pub accepted_extensions: Vec<String>,
}
impl Default for Images {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            accepted_extensions: ["png", "jpg", "jpeg", "gif", "webp", "bmp", "heic", "svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub model: ModelKind,
    /// Random forest size.
    pub n_trees: usize,
    pub boosting_stages: usize,
    pub learning_rate: f64,
    /// Depth of each boosting stage.
    pub max_depth: u16,
    /// Seeds the synthetic data, the train/test split and the forest.
    pub seed: u64,
    pub test_fraction: f64,
    pub sample_start_year: i32,
    pub sample_end_year: i32,
}
impl Default for Prediction {
    fn default() -> Self {
        Self {
            model: ModelKind::RandomForest,
            n_trees: 100,
            boosting_stages: 100,
            learning_rate: 0.1,
            max_depth: 3,
            seed: 42,
            test_fraction: 0.2,
            sample_start_year: 2000,
            sample_end_year: 2024,
        }
    }
}

impl Prediction {
    pub fn validate(&self) -> Result<(), PredictionError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PredictionError::InvalidInput {
                field: "test_fraction",
                reason: format!("{} is not between 0 and 1", self.test_fraction),
            });
        }
        for (field, count) in [("n_trees", self.n_trees), ("boosting_stages", self.boosting_stages)] {
            if count == 0 {
                return Err(PredictionError::InvalidInput {
                    field,
                    reason: "must be at least 1".into(),
                });
            }
        }
        if !(self.learning_rate > 0.0) {
            return Err(PredictionError::InvalidInput {
                field: "learning_rate",
                reason: format!("{} is not positive", self.learning_rate),
            });
        }
        Ok(())
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            n_trees: self.n_trees,
            boosting_stages: self.boosting_stages,
            learning_rate: self.learning_rate,
            max_depth: self.max_depth.max(1),
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
