//! Application settings

use serde::{Deserialize, Serialize};
use shared::{AppMode, DisplayField};

use crate::i18n::Lang;

/// Label attribute per record mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub installation: DisplayField,
    #[serde(default)]
    pub delivery: DisplayField,
    #[serde(default)]
    pub bolting: DisplayField,
}

impl DisplaySettings {
    /// Field used in the given mode; statistics lists follow the installation setting
    pub fn field_for(&self, mode: AppMode) -> DisplayField {
        match mode {
            AppMode::Installation | AppMode::Statistics => self.installation,
            AppMode::Delivery => self.delivery,
            AppMode::Bolting => self.bolting,
        }
    }

    /// Statistics has no own setting; setting it changes nothing
    pub fn set(&mut self, mode: AppMode, field: DisplayField) {
        match mode {
            AppMode::Installation => self.installation = field,
            AppMode::Delivery => self.delivery = field,
            AppMode::Bolting => self.bolting = field,
            AppMode::Statistics => {}
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Part label preferences
    #[serde(default)]
    pub display: DisplaySettings,
    /// UI language
    #[serde(default)]
    pub language: Lang,
}

impl TrackerSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "assembly-tracker", "assembly-tracker")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed settings file {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Cannot create settings directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Cannot write settings to {}: {e}", path.display());
                }
            }
            Err(e) => tracing::warn!("Cannot serialize settings: {e}"),
        }
    }
}
