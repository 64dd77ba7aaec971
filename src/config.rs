//! Configuration file support for the document viewer.
//!
//! A single versioned JSON file carries the endpoint, interaction limits,
//! transform policy, keybindings and preferences.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::TransformPolicy;
use crate::constants::lifetime;
use crate::fetch::{Endpoint, RequestMethod};
use crate::keybindings::ViewerKeyBindings;
use crate::viewer::InteractionLimits;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Endpoint used when no configuration file is present.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8080/api/documents/view";

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Document endpoint
    pub endpoint: Endpoint,

    #[serde(default)]
    pub interaction: InteractionLimits,

    #[serde(default)]
    pub transform: TransformPolicy,

    #[serde(default)]
    pub keybindings: ViewerKeyBindings,

    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Seconds before an unreleased resource is released anyway
    #[serde(default = "default_fallback_release_secs")]
    pub fallback_release_secs: u64,

    /// Seconds a failure notification stays visible
    #[serde(default = "default_notification_ttl_secs")]
    pub notification_ttl_secs: u64,

    /// Detect images by magic bytes when the declared type is missing or generic
    #[serde(default)]
    pub sniff_image_signatures: bool,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_fallback_release_secs() -> u64 {
    lifetime::FALLBACK_RELEASE_SECS
}

fn default_notification_ttl_secs() -> u64 {
    lifetime::NOTIFICATION_TTL_SECS
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            fallback_release_secs: default_fallback_release_secs(),
            notification_ttl_secs: default_notification_ttl_secs(),
            sniff_image_signatures: false,
            log_level: LogLevel::default(),
        }
    }
}

impl ViewerConfig {
    /// Create a configuration for `endpoint` with default values elsewhere.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            version: CONFIG_VERSION,
            endpoint,
            interaction: InteractionLimits::default(),
            transform: TransformPolicy::default(),
            keybindings: ViewerKeyBindings::default(),
            preferences: Preferences::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.url.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint url is empty".to_string()));
        }
        self.interaction.check().map_err(ConfigError::Invalid)?;
        if self.preferences.fallback_release_secs == 0 {
            return Err(ConfigError::Invalid(
                "fallback_release_secs must be positive".to_string(),
            ));
        }
        if let Some(conflict) = self.keybindings.key_conflict() {
            return Err(ConfigError::Invalid(conflict));
        }
        Ok(())
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "docview-config.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("docview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("docview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load from the default path, falling back to defaults when there is no file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                log::debug!("No config file found at {:?}", path);
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new(Endpoint::new(DEFAULT_ENDPOINT_URL, RequestMethod::Post))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Values that parse but cannot work together
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
