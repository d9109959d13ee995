use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::error::{Error, Result};

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SONICFLOW__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SONICFLOW")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.audio.initial_volume) {
            return Err(Error::InvalidConfig(
                "audio.initial_volume must be within [0, 1]".to_string(),
            ));
        }
        if !(self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0) {
            return Err(Error::InvalidConfig(
                "controls.volume_step must be within (0, 1]".to_string(),
            ));
        }
        if self.enrichment.workers == 0 {
            return Err(Error::InvalidConfig(
                "enrichment.workers must be >= 1".to_string(),
            ));
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "library.extensions must name at least one extension".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the config path from `SONICFLOW_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SONICFLOW_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/sonicflow/config.toml`
/// or `~/.config/sonicflow/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("sonicflow").join("config.toml"))
}
