use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::signed_urls::ResponseLayout;

/// Default path of the storage service's signed-URL endpoint.
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/v4/file/url";

/// Runtime configuration loaded from `~/.config/pathtag/config.toml`.
///
/// The metrics host is deliberately absent: it is fixed at build time
/// (see [`crate::host_scope::METRICS_HOST`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathtagConfig {
    /// Request path that identifies the signed-URL endpoint (query ignored).
    pub endpoint_path: String,
    /// Where the entry array lives in the endpoint's response body.
    pub response_layout: ResponseLayout,
    /// Connect timeout for the curl transport, in seconds.
    pub connect_timeout_secs: u64,
    /// Total transfer timeout for the curl transport, in seconds.
    pub timeout_secs: u64,
}

impl Default for PathtagConfig {
    fn default() -> Self {
        Self {
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            response_layout: ResponseLayout::Auto,
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pathtag")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PathtagConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PathtagConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PathtagConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
