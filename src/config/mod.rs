//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SHARK_TANK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use shark_tank::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Database at {}", config.database.host);
//! ```

mod ai;
mod database;
mod error;
mod logging;
mod pitch;

pub use ai::{AiConfig, AiProvider};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use pitch::PitchConfig;

use serde::Deserialize;

/// Plain environment variable accepted as a fallback for the Anthropic key.
const ANTHROPIC_KEY_FALLBACK: &str = "ANTHROPIC_API_KEY";

/// Root application configuration
///
/// Every section has defaults, so the simulation runs with no environment
/// at all (offline generator, local PostgreSQL defaults).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Text generation configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Pitch defaults
    #[serde(default)]
    pub pitch: PitchConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SHARK_TANK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SHARK_TANK__DATABASE__URL=...` -> `database.url = ...`
    /// - `SHARK_TANK__PITCH__DEFAULT_EQUITY=15` -> `pitch.default_equity = 15`
    ///
    /// A bare `ANTHROPIC_API_KEY` is used when `SHARK_TANK__AI__ANTHROPIC_API_KEY`
    /// is unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SHARK_TANK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if config.ai.anthropic_api_key.is_none() {
            config.ai.anthropic_api_key = std::env::var(ANTHROPIC_KEY_FALLBACK)
                .ok()
                .filter(|k| !k.is_empty());
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.ai.validate()?;
        self.pitch.validate()?;
        Ok(())
    }
}
