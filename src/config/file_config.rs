use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub dump_dir: Option<String>,
    pub db_path: Option<String>,
    pub seed: Option<u64>,
    pub week: Option<String>,
    pub strict: Option<bool>,

    // Feature configs
    pub engagement: Option<EngagementConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EngagementConfig {
    pub downloads_mean: Option<f64>,
    pub downloads_std_dev: Option<f64>,
    pub streams_mean: Option<f64>,
    pub streams_std_dev: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
