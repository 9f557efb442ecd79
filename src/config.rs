use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::display::{DisplayMode, StatusAlignment};
use crate::error::{ProjectVersionError, Result};

/// File name looked up in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "project-version.toml";

/// Returns the default status item priority.
fn default_priority() -> i32 {
    1000
}

/// Returns the default version strictness.
fn default_strict() -> bool {
    true
}

/// Represents the complete configuration for project-version.
///
/// Keys are camelCase, e.g. `autoSaveOnVersionChange = true`. Alignment and
/// priority are never interpreted here; they are handed to the host as-is.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub display: DisplayMode,

    /// Template used when `display` is `Custom`
    #[serde(default)]
    pub custom_format: String,

    /// Write bumped manifests straight to storage instead of handing the
    /// text back for a manual save
    #[serde(default)]
    pub auto_save_on_version_change: bool,

    #[serde(default)]
    pub status_bar_item_alignment: StatusAlignment,

    #[serde(default = "default_priority")]
    pub status_bar_item_priority: i32,

    /// Only accept plain `MAJOR.MINOR.PATCH` versions
    #[serde(default = "default_strict")]
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display: DisplayMode::default(),
            custom_format: String::new(),
            auto_save_on_version_change: false,
            status_bar_item_alignment: StatusAlignment::default(),
            status_bar_item_priority: default_priority(),
            strict: default_strict(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ProjectVersionError::config(e.to_string()))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `project-version.toml` in current directory
/// 3. `project-version.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| ProjectVersionError::config(format!("cannot read {}: {}", path, e)))?
    } else if local.exists() {
        fs::read_to_string(&local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            tracing::debug!("no configuration file found, using defaults");
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    Config::from_toml(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display, DisplayMode::IconAndText);
        assert_eq!(config.custom_format, "");
        assert!(!config.auto_save_on_version_change);
        assert_eq!(config.status_bar_item_alignment, StatusAlignment::Right);
        assert_eq!(config.status_bar_item_priority, 1000);
        assert!(config.strict);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_camel_case_keys() {
        let config = Config::from_toml(
            r#"
display = "Custom"
customFormat = "v${version}"
autoSaveOnVersionChange = true
statusBarItemAlignment = "Left"
statusBarItemPriority = 5
strict = false
"#,
        )
        .unwrap();
        assert_eq!(config.display, DisplayMode::Custom);
        assert_eq!(config.custom_format, "v${version}");
        assert!(config.auto_save_on_version_change);
        assert_eq!(config.status_bar_item_alignment, StatusAlignment::Left);
        assert_eq!(config.status_bar_item_priority, 5);
        assert!(!config.strict);
    }

    #[test]
    fn test_human_readable_display_names() {
        let config = Config::from_toml("display = \"Text only\"").unwrap();
        assert_eq!(config.display, DisplayMode::TextOnly);
        let config = Config::from_toml("display = \"Icon and Text\"").unwrap();
        assert_eq!(config.display, DisplayMode::IconAndText);
    }

    #[test]
    fn test_unknown_display_is_error() {
        let err = Config::from_toml("display = \"Sparkles\"").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
