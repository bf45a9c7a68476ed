//! Configuration file support for Cyclelator.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/cyclelator/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Calendar rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Days rendered when a range end is not given
    #[serde(default = "default_span_days")]
    pub default_span_days: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            default_span_days: default_span_days(),
        }
    }
}

/// Avatar color configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_palette")]
    pub available: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            available: default_palette(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("cyclelator")
}

fn default_span_days() -> u32 {
    30
}

fn default_palette() -> Vec<String> {
    crate::palette::builtin_palette().to_vec()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("cyclelator").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.palette.available.is_empty());
        assert_eq!(config.calendar.default_span_days, 30);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.calendar.default_span_days,
            parsed.calendar.default_span_days
        );
        assert_eq!(config.palette.available, parsed.palette.available);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[calendar]
default_span_days = 60
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.calendar.default_span_days, 60);
        assert!(!config.palette.available.is_empty()); // default
    }
}
