use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data_source::DEFAULT_UNITS;
use crate::error::Result;

/// Persisted application settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Units given to datasets whose descriptor does not name any.
    pub default_units: String,
    pub show_properties_panel: bool,
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
    pub recent_descriptors: Vec<PathBuf>,
}

const MAX_RECENT: usize = 8;

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_units: DEFAULT_UNITS.to_string(),
            show_properties_panel: true,
            window_width: None,
            window_height: None,
            recent_descriptors: Vec::new(),
        }
    }
}

impl AppSettings {
    /// User settings file, if a config directory is available.
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tomoview").join("settings.toml"))
    }

    /// Load from the user settings file, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            warn!("Ignoring settings at {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Write to the user settings file; failures are logged.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else {
            return;
        };
        if let Err(e) = self.save_to(&path) {
            warn!("Failed to save settings to {}: {e}", path.display());
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Move `path` to the front of the recent list.
    pub fn push_recent(&mut self, path: PathBuf) {
        self.recent_descriptors.retain(|p| p != &path);
        self.recent_descriptors.insert(0, path);
        self.recent_descriptors.truncate(MAX_RECENT);
    }
}
