//! Console settings (`<config_dir>/lime/config.toml`)
//!
//! ```toml
//! [server]
//! url = "http://mds01:24"
//!
//! [qos]
//! gauge_max = 1000.0
//! rate_step = 100.0
//!
//! [ui]
//! tick_ms = 50
//! ```
//!
//! Missing or unreadable files fall back to defaults; command line flags
//! override whatever is loaded.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use lime_core::prelude::*;

/// Directory under the platform config dir
pub const LIME_DIR: &str = "lime";
/// Settings file name
pub const CONFIG_FILENAME: &str = "config.toml";

/// Default address of the LIME web service
pub const DEFAULT_SERVER_URL: &str = "http://localhost:24";

/// Global console settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub qos: QosSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the web service (`http://host:port`)
    #[serde(default = "default_server_url")]
    pub url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QosSettings {
    /// Upper bound of the per-job throughput gauge, in MB/s
    #[serde(default = "default_gauge_max")]
    pub gauge_max: f64,

    /// Amount a single `+`/`-` press changes a job's rate limit by, in MB/s
    #[serde(default = "default_rate_step")]
    pub rate_step: f64,
}

impl Default for QosSettings {
    fn default() -> Self {
        Self {
            gauge_max: default_gauge_max(),
            rate_step: default_rate_step(),
        }
    }
}

fn default_gauge_max() -> f64 {
    1000.0
}

fn default_rate_step() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UiSettings {
    /// Terminal event poll interval; also the tick period
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_tick_ms() -> u64 {
    50
}

/// `<config_dir>/lime/config.toml`, when the platform has a config dir
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(LIME_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`, falling back to defaults
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No settings file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.url, "http://localhost:24");
        assert_eq!(settings.qos.gauge_max, 1000.0);
        assert_eq!(settings.qos.rate_step, 100.0);
        assert_eq!(settings.ui.tick_ms, 50);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(&temp.path().join("nope.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nurl = \"http://mds01:24\"\n\n[qos]\nrate_step = 25.0\n")
            .unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.server.url, "http://mds01:24");
        assert_eq!(settings.qos.rate_step, 25.0);
        assert_eq!(settings.qos.gauge_max, 1000.0);
        assert_eq!(settings.ui.tick_ms, 50);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\nurl = ").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }
}
