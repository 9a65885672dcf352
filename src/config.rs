use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::pipeline::PipelineOptions;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "AUTO_ANALYZER_CONFIG";

/// Application settings. Every field has a default, so a config file only
/// needs the keys it changes:
///
/// ```json
/// { "preview_rows": 10, "pipeline": { "delimiter": ";", "charts": { "max_charts_per_kind": 12 } } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineOptions,
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineOptions::default(),
            preview_rows: 5,
        }
    }
}

impl AppConfig {
    /// Load from the file named by `AUTO_ANALYZER_CONFIG`, or defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text).context("parsing config JSON")?;
        config.pipeline.delimiter_byte()?;
        Ok(config)
    }
}
