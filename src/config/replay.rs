use super::pairing::PairingParams;
use crate::error::{Error, Result};
use crate::types::{DatasetSide, PairId};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ReplayConfig {
    pub raw: DatasetInput,
    #[serde(rename = "ref")]
    pub ref_: DatasetInput,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub params: PairingParams,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
    #[serde(default)]
    pub output: OutputConfig,
    pub service: Option<ServiceConfig>,
}

#[derive(Debug, Deserialize)]
pub struct DatasetInput {
    pub geojson: PathBuf,
    /// `[minX, minY, maxX, maxY]` in the dataset's native coordinates.
    pub bounds: Option<[f64; 4]>,
    /// Attribute used for feature labels; defaults to the collection's first column.
    pub key_column: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// One operator action in a replay script.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Screen-space click on one map.
    Click { side: DatasetSide, x: f64, y: f64 },
    Remove { id: PairId },
    Reset,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    pub json_out: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub session_id: String,
    #[serde(default = "default_archive_out")]
    pub archive_out: PathBuf,
}

fn default_archive_out() -> PathBuf {
    PathBuf::from("georef_final.zip")
}

pub fn load_config(path: &Path) -> Result<ReplayConfig> {
    let data = fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: format!("Failed to read: {e}"),
    })?;
    serde_json::from_str(&data).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: format!("Failed to parse: {e}"),
    })
}
