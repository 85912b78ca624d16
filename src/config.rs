//! JSON configuration for the demo tool.

use crate::pipeline::PipelineParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct VectorizeToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub pipeline: PipelineParams,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "shapes_json")]
    pub shapes_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<VectorizeToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
