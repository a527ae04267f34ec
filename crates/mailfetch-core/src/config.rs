use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::fetcher::FetchSettings;
use crate::retry::{BASE_DELAY, MAX_DELAY, MAX_TIMEOUT_ERRORS};

/// Retry parameters for attachment fetches (`[fetch]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timed out attempts tolerated per attachment before giving up.
    pub max_timeout_errors: u32,
    /// Socket timeout of the first attempt, in seconds (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Ceiling for the escalating socket timeout, in seconds.
    pub max_delay_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_timeout_errors: MAX_TIMEOUT_ERRORS,
            base_delay_secs: BASE_DELAY.as_secs_f64(),
            max_delay_secs: MAX_DELAY.as_secs(),
        }
    }
}

impl FetchConfig {
    /// Convert to validated fetcher settings.
    pub fn to_settings(&self) -> Result<FetchSettings, ConfigError> {
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs)
            .map_err(|e| ConfigError::InvalidDelay(format!("base_delay_secs = {}: {}", self.base_delay_secs, e)))?;
        let settings = FetchSettings {
            max_timeout_errors: self.max_timeout_errors,
            base_delay,
            max_delay: Duration::from_secs(self.max_delay_secs),
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Global configuration loaded from `~/.config/mailfetch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailfetchConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Read buffer used when streaming local files through a decoder (None = 64 KiB).
    #[serde(default)]
    pub decode_buffer_bytes: Option<usize>,
}

impl MailfetchConfig {
    pub const DEFAULT_DECODE_BUFFER_BYTES: usize = 64 * 1024;

    pub fn decode_buffer_bytes(&self) -> usize {
        self.decode_buffer_bytes
            .filter(|&n| n > 0)
            .unwrap_or(Self::DEFAULT_DECODE_BUFFER_BYTES)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mailfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MailfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MailfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MailfetchConfig = toml::from_str(&data)?;
    cfg.fetch.to_settings()?;
    Ok(cfg)
}
