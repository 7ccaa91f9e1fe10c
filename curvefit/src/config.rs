use burn::config::Config;
use std::path::PathBuf;
use crate::prelude::*;

#[derive(Config, Debug)]
pub struct TrainingConfig {
    #[config(default = 700)]
    pub iterations: usize,

    #[config(default = 0.005)]
    pub lr_max: f64,

    #[config(default = 0.0005)]
    pub lr_min: f64,

    #[config(default = 1)]
    pub seed: u64,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("app/models")
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default = "TrainingConfig::new")]
    pub training: TrainingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            device: DeviceConfig::default(),
            training: TrainingConfig::new(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_models_dir<P: Into<PathBuf>>(mut self, models_dir: P) -> Self {
        self.models_dir = models_dir.into();
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.training.iterations = iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_published_schedule() {
        let config = RuntimeConfig::default();
        assert_eq!(config.models_dir, PathBuf::from("app/models"));
        assert_eq!(config.device, DeviceConfig::Cpu);
        assert_eq!(config.training.iterations, 700);
        assert_eq!(config.training.lr_max, 0.005);
        assert_eq!(config.training.lr_min, 0.0005);
        assert_eq!(config.training.seed, 1);
    }
}
