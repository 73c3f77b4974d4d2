//! # tally-config
//!
//! Layered configuration loading for tally using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TALLY_*` prefix, `__` as separator)
//! 2. Project-level `.tally/config.toml`
//! 3. User-level `~/.config/tally/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TALLY_REVIEW__QUORUM_THRESHOLD` -> `review.quorum_threshold`,
//! `TALLY_DATABASE__PATH` -> `database.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use tally_config::TallyConfig;
//!
//! let config = TallyConfig::load_with_dotenv().expect("config");
//! println!("quorum: {}", config.review.quorum_threshold);
//! ```

mod database;
mod error;
mod general;
mod review;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use review::ReviewConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TallyConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load with an explicit project root instead of the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_for_project(root: &Path) -> Result<Self, ConfigError> {
        let env_path = root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }
        let config: Self = Self::figment_for(root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain rooted at the current directory.
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain rooted at `root`.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment_for(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = root.join(".tally").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TALLY_").split("__"))
    }

    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.review.quorum_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "review.quorum_threshold".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.review.required_areas.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "review.required_areas".into(),
                reason: "areas must not be blank".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }
}
