//! Runtime settings
//!
//! Read from a JSON file at startup. Every field has a default so a partial
//! file (or no file at all) is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_UDP_PORT;

/// Env var naming the settings file when no CLI argument is given
pub const SETTINGS_PATH_ENV: &str = "ARENA_VIS_SETTINGS";
/// Env var overriding `udp_port`
pub const PORT_ENV: &str = "ARENA_VIS_PORT";
/// Settings file used when neither CLI nor env names one
pub const DEFAULT_SETTINGS_FILE: &str = "arena_vis_settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Network ===
    /// Address the snapshot socket binds to
    pub bind_address: String,
    pub udp_port: u16,
    /// Skip snapshots whose `seq` is not newer than the last accepted one
    pub reject_stale_packets: bool,

    // === Frame loop ===
    pub frame_rate_hz: u32,
    /// Spin bodies without a sent orientation by their angular velocity
    pub extrapolate_rotation: bool,

    // === Logging ===
    /// env_logger filter, e.g. "debug" or "arena_vis=trace"
    pub log_level: Option<String>,
    /// Seconds between status lines (0 disables them)
    pub status_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            udp_port: DEFAULT_UDP_PORT,
            reject_stale_packets: false,

            frame_rate_hz: 60,
            extrapolate_rotation: true,

            log_level: None,
            status_interval_secs: 5,
        }
    }
}

impl Settings {
    /// Settings file path: first CLI argument, then env, then the default name
    pub fn resolve_path(cli_arg: Option<String>) -> PathBuf {
        cli_arg
            .or_else(|| std::env::var(SETTINGS_PATH_ENV).ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields defaults; an unreadable or invalid one is an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let settings = Self::from_json(&json).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        self.apply_port_override(std::env::var(PORT_ENV).ok().as_deref());
    }

    fn apply_port_override(&mut self, value: Option<&str>) {
        let Some(value) = value else { return };
        match value.trim().parse() {
            Ok(port) => self.udp_port = port,
            Err(_) => log::warn!("Ignoring {PORT_ENV}={value:?}: not a port number"),
        }
    }

    /// `bind_address:udp_port`
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.udp_port)
    }

    /// Target frame duration in seconds
    pub fn frame_interval(&self) -> f64 {
        1.0 / f64::from(self.frame_rate_hz.max(1))
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
