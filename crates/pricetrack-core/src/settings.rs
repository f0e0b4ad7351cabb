//! The persisted settings file (YAML).
//!
//! Recognised keys: `datafile`, `img_folder`, `products_per_plot`,
//! `match_threshold`, `wait_timeout_secs`. Any other key is kept as-is when
//! the file is rewritten.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_PRODUCTS_PER_PLOT: usize = 5;
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.20;
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the catalog JSON file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datafile: Option<PathBuf>,

    /// Directory receiving rendered price charts. `report` names it above
    /// the chart listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_folder: Option<PathBuf>,

    /// How many price series go on one chart. Older files store it as a
    /// quoted string, so both forms are accepted.
    #[serde(
        default = "default_products_per_plot",
        deserialize_with = "number_or_string"
    )]
    pub products_per_plot: usize,

    /// Upper bound on the normalized edit distance for two product names to
    /// be considered the same product.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Bounded wait applied to each search step, in seconds.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            datafile: None,
            img_folder: None,
            products_per_plot: DEFAULT_PRODUCTS_PER_PLOT,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            extra: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Returns the configured catalog path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSetting`] if `datafile` is unset.
    pub fn datafile(&self) -> Result<&Path, ConfigError> {
        self.datafile
            .as_deref()
            .ok_or(ConfigError::MissingSetting("datafile"))
    }

    /// Points `datafile` at `raw`, appending `.json` when no extension is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] if the resulting path is not an
    /// existing file.
    pub fn update_datafile(&mut self, raw: &str) -> Result<(), ConfigError> {
        let raw = raw.trim();
        let candidate = if Path::new(raw).extension().is_some_and(|ext| ext == "json") {
            PathBuf::from(raw)
        } else {
            PathBuf::from(format!("{raw}.json"))
        };

        if !candidate.is_file() {
            return Err(ConfigError::InvalidSetting {
                key: "datafile",
                reason: format!("{} is not an existing file", candidate.display()),
            });
        }

        self.datafile = Some(candidate);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] if `raw` is not an existing directory.
    pub fn update_img_folder(&mut self, raw: &str) -> Result<(), ConfigError> {
        let candidate = PathBuf::from(raw.trim());
        if !candidate.is_dir() {
            return Err(ConfigError::InvalidSetting {
                key: "img_folder",
                reason: format!("{} is not an existing directory", candidate.display()),
            });
        }
        self.img_folder = Some(candidate);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] if `raw` is not a positive integer.
    pub fn update_products_per_plot(&mut self, raw: &str) -> Result<(), ConfigError> {
        let value = raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| ConfigError::InvalidSetting {
                key: "products_per_plot",
                reason: format!("expected a positive integer, got {raw:?}"),
            })?;
        self.products_per_plot = value;
        Ok(())
    }
}

/// Loads settings from `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::SettingsIo`] if the file exists but cannot be read,
/// [`ConfigError::SettingsParse`] if it is not valid YAML, or
/// [`ConfigError::InvalidSetting`] if a value is out of range.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Settings::default());
        }
        Err(e) => {
            return Err(ConfigError::SettingsIo {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(&content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Writes `settings` to `path` as YAML.
///
/// # Errors
///
/// Returns [`ConfigError::SettingsParse`] if serialization fails or
/// [`ConfigError::SettingsIo`] if the file cannot be written.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(settings)?;
    std::fs::write(path, content).map_err(|e| ConfigError::SettingsIo {
        path: path.display().to_string(),
        source: e,
    })
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&settings.match_threshold) {
        return Err(ConfigError::InvalidSetting {
            key: "match_threshold",
            reason: format!("{} is outside 0.0..=1.0", settings.match_threshold),
        });
    }
    if settings.products_per_plot == 0 {
        return Err(ConfigError::InvalidSetting {
            key: "products_per_plot",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn default_products_per_plot() -> usize {
    DEFAULT_PRODUCTS_PER_PLOT
}

fn default_match_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_wait_timeout_secs() -> u64 {
    DEFAULT_WAIT_TIMEOUT_SECS
}

fn number_or_string<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(usize),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
