use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_STEM, DEFAULT_INCLUSIVE, DEFAULT_LIMIT, DEFAULT_LOG_LEVEL, ENV_PREFIX,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Defaults applied by callers of the recurrence engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Result cap used when a query does not name one.
    pub default_limit: u16,
    /// Whether window boundaries that are themselves occurrences are returned.
    pub inclusive: bool,
}

impl EngineConfig {
    /// ## Summary
    /// Checks that the configured values can drive a query.
    ///
    /// ## Errors
    /// Returns an error if `default_limit` is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.default_limit == 0 {
            return Err(CoreError::ConfigError(
                "engine.default_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            inclusive: DEFAULT_INCLUSIVE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`
    /// into a `Settings`. Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the engine section fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("engine.default_limit", i64::from(DEFAULT_LIMIT))?
            .set_default("engine.inclusive", DEFAULT_INCLUSIVE)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE_STEM).required(false))
            // Environment, e.g. CADENCE_ENGINE__DEFAULT_LIMIT
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.engine.validate()?;
        tracing::debug!(engine = ?settings.engine, "Engine settings resolved");

        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
