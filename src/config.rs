//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`ROTLAB_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use rotlab_core::{AxisOrder, EngineSettings};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Rotation engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
    /// Output formatting
    #[serde(default)]
    pub display: DisplayConfig,
    /// Preset library configuration
    #[serde(default)]
    pub presets: PresetsConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`ROTLAB_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // ROTLAB_ENGINE__DEFAULT_ORDER=ZYX -> engine.default_order = "ZYX"
        figment = figment.merge(Env::prefixed("ROTLAB_").split("__"));

        let config: Self = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tol = self.engine.determinant_tolerance;
        if !(tol.is_finite() && tol > 0.0) {
            return Err(ConfigError::invalid(format!(
                "engine.determinant_tolerance must be a positive number, got {}",
                tol
            )));
        }
        if self.display.precision > 15 {
            return Err(ConfigError::invalid(format!(
                "display.precision must be at most 15, got {}",
                self.display.precision
            )));
        }
        Ok(())
    }
}

/// Rotation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Euler order used until a command picks another one
    pub default_order: AxisOrder,
    /// Allowed |det - 1| before a matrix is reported as non-orthonormal
    pub determinant_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            default_order: settings.euler_order,
            determinant_tolerance: settings.determinant_tolerance,
        }
    }
}

impl EngineConfig {
    /// Engine settings built from this config
    pub fn to_settings(&self) -> EngineSettings {
        EngineSettings {
            euler_order: self.default_order,
            determinant_tolerance: self.determinant_tolerance,
        }
    }
}

/// Output formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places for every printed number
    pub precision: usize,
    /// Print every representation after each command (otherwise only on `show`)
    pub show_all_representations: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: 3,
            show_all_representations: true,
        }
    }
}

/// Preset library configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetsConfig {
    /// Extra RON preset library merged over the built-in presets
    #[serde(default)]
    pub library: Option<PathBuf>,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: String) -> Self {
        ConfigError { message }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
