use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::limits::{EnvCeiling, FixedCeiling, UploadCeiling};
use crate::policy::{DEFAULT_PERMITTED_TYPES, DEFAULT_QUARANTINE_SUFFIX};
use crate::size::parse_byte_size;

/// Global configuration loaded from `~/.config/intake/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Per-file maximum in byte-size syntax (`"150k"`, `"2M"`).
    pub max_size: String,
    /// MIME types accepted while type checking is on.
    pub permitted_types: Vec<String>,
    /// Skip MIME checks and quarantine-suffix untrusted names instead.
    pub allow_all_types: bool,
    /// Suffix for untrusted names; only read when `allow_all_types` is set.
    #[serde(default)]
    pub quarantine_suffix: Option<String>,
    /// Pick `name_1.ext`, `name_2.ext`, ... instead of overwriting.
    pub rename_duplicates: bool,
    /// Emit the old two-message sequence for transport error 3.
    #[serde(default)]
    pub legacy_partial_fallthrough: bool,
    /// Server upload ceiling; if missing, read from the environment.
    #[serde(default)]
    pub upload_max_filesize: Option<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_size: "150k".to_string(),
            permitted_types: DEFAULT_PERMITTED_TYPES.iter().map(|s| s.to_string()).collect(),
            allow_all_types: false,
            quarantine_suffix: Some(DEFAULT_QUARANTINE_SUFFIX.to_string()),
            rename_duplicates: true,
            legacy_partial_fallthrough: false,
            upload_max_filesize: None,
        }
    }
}

impl IntakeConfig {
    /// The ceiling to validate `max_size` against: the configured override,
    /// or the environment.
    pub fn ceiling(&self) -> Result<Box<dyn UploadCeiling>> {
        match &self.upload_max_filesize {
            Some(raw) => {
                let bytes = parse_byte_size(raw)
                    .with_context(|| format!("invalid upload_max_filesize: {:?}", raw))?;
                Ok(Box::new(FixedCeiling(bytes)))
            }
            None => Ok(Box::new(EnvCeiling)),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("intake")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<IntakeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = IntakeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: IntakeConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
