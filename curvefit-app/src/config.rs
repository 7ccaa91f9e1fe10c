use anyhow::{Context, Result};
use curvefit::prelude::*;
use curvefit_io::prelude::*;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "curvefit.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub animation: PathBuf,
    pub plot: PathBuf,
    pub fps: u32,
    pub frame_size: (u32, u32),
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            animation: "./curve.gif".into(),
            plot: "./forecast.svg".into(),
            fps: 60,
            frame_size: (1200, 700),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
   pub path: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self { path: "./logs".into() }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: CsvSource,
    #[serde(default)]
    pub model: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tracing_config: TracingConfig,
}

/// Reads `path`, or `curvefit.toml` when none is given. A missing default
/// file means all defaults; a missing explicit file is an error.
pub fn get_config(path: Option<&str>) -> Result<AppConfig> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG);
    if path.is_none() && !Path::new(config_path).exists() {
        return Ok(AppConfig::default());
    }
    let to_parsed_string = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading config {}", config_path))?;
    let config = toml::from_str(&to_parsed_string)
        .with_context(|| format!("parsing config {}", config_path))?;
    Ok(config)
}
