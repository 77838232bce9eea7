use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::EngineRegistry;

/// Global configuration loaded from `~/.config/apnretry/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApnRetryConfig {
    /// Number of logical lines (SIM slots) to create engines for.
    pub slot_count: u32,
    /// Optional carrier policy file (JSON) applied to every slot; if missing,
    /// built-in defaults are used.
    #[serde(default)]
    pub carrier_policy_path: Option<PathBuf>,
    /// Optional tracing filter directive (e.g. "info,apnretry_core=trace").
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for ApnRetryConfig {
    fn default() -> Self {
        Self {
            slot_count: 1,
            carrier_policy_path: None,
            log_filter: None,
        }
    }
}

impl ApnRetryConfig {
    /// Read the configured carrier policy file, if one is set.
    pub fn read_carrier_policy(&self) -> Result<Option<String>> {
        self.carrier_policy_path
            .as_deref()
            .map(read_policy_file)
            .transpose()
    }

    /// Create one engine per slot and apply the carrier policy to each.
    ///
    /// A rejected policy file is not an error here: the engines run on the
    /// built-in defaults and the rejection is logged.
    pub fn build_registry(&self) -> Result<EngineRegistry> {
        let raw = self.read_carrier_policy()?;
        let mut registry = EngineRegistry::new();
        for slot in 0..self.slot_count {
            registry.create(slot);
        }
        // Rejections are already logged per slot.
        let _ = registry.on_configuration_changed_all(raw.as_deref());
        Ok(registry)
    }
}

/// Read a carrier policy file as text.
pub fn read_policy_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read carrier policy: {}", path.display()))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("apnretry")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ApnRetryConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<ApnRetryConfig> {
    if !path.exists() {
        let default_cfg = ApnRetryConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: ApnRetryConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
