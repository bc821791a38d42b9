// CLI settings
// Loaded from ~/.config/meater/settings.json

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    // API
    /// Override for the MEATER Cloud API root. None = built-in default.
    #[serde(rename = "api.baseUrl")]
    pub api_base: Option<String>,

    #[serde(rename = "api.timeoutSecs")]
    pub timeout_secs: u64,

    // Logging
    /// tracing-subscriber EnvFilter directive, e.g. "meater_client=debug"
    #[serde(rename = "log.filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: None,
            timeout_secs: 30,
            log_filter: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meater");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults.
    /// Writes a commented template on first run.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load settings from an explicit path. Missing or broken files give defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read settings");
                }
                return Self::default();
            }
        };

        // Strip comments (lines starting with //)
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        match serde_json::from_str(&cleaned) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot parse settings, using defaults");
                Self::default()
            }
        }
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::debug!(error = %e, "cannot create config directory");
                return;
            }
        }

        let default_config = r#"{
    // MEATER Cloud API root (null = https://public-api.cloud.meater.com/v1)
    "api.baseUrl": null,

    // Per-request timeout in seconds
    "api.timeoutSecs": 30,

    // Log filter, same syntax as MEATER_LOG / RUST_LOG
    "log.filter": "warn"
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            tracing::debug!(error = %e, "cannot write default settings.json");
        }
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
