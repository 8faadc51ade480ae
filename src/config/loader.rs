//! Configuration Loader
//!
//! Layers configuration sources with the `config` crate and validates the
//! result. Loading takes the environment as an explicit map so tests do not
//! have to mutate process-wide variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::{debug, info};

use super::error::{ConfigResult, ConfigurationError};
use super::BridgeConfig;
use crate::constants::{defaults, env};

/// Zero-state loader; all methods are associated functions
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the process environment
    pub fn load() -> ConfigResult<BridgeConfig> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_vars(&vars)
    }

    /// Load configuration using `vars` in place of the process environment
    ///
    /// The file path comes from `BRIDGE_CONFIG_PATH`, falling back to
    /// `config/task-bridge.toml`. A missing file is not an error.
    pub fn load_with_vars(vars: &HashMap<String, String>) -> ConfigResult<BridgeConfig> {
        let path = vars
            .get(env::CONFIG_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::CONFIG_PATH));

        Self::load_from_path(&path, vars)
    }

    pub fn load_from_path(path: &Path, vars: &HashMap<String, String>) -> ConfigResult<BridgeConfig> {
        let defaults = Config::try_from(&BridgeConfig::default())
            .map_err(|e| ConfigurationError::load_error("defaults", e))?;

        let environment_vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let builder = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(env::PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(environment_vars)),
            )
            .set_override_option("environment", Self::environment_from(vars))
            .and_then(|b| b.set_override_option("messaging.url", non_empty(vars, env::RABBITMQ_URL)))
            .and_then(|b| {
                b.set_override_option("messaging.task_queue", non_empty(vars, env::RABBITMQ_TASK_QUEUE))
            })
            .and_then(|b| b.set_override_option("store.url", non_empty(vars, env::REDIS_URL)))
            .map_err(|e| ConfigurationError::load_error("environment overrides", e))?;

        let merged = builder
            .build()
            .map_err(|e| ConfigurationError::load_error(path.display().to_string(), e))?;

        let config: BridgeConfig = merged
            .try_deserialize()
            .map_err(ConfigurationError::parse_error)?;

        config.validate()?;

        debug!(
            path = %path.display(),
            task_queue = %config.messaging.task_queue,
            key_prefix = %config.store.key_prefix,
            "Configuration sources merged"
        );
        info!(environment = %config.environment, "Configuration loaded successfully");

        Ok(config)
    }

    /// Environment name from `BRIDGE_ENV`, then `APP_ENV`, else `development`
    pub fn detect_environment() -> String {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::environment_from(&vars).unwrap_or_else(|| "development".to_string())
    }

    fn environment_from(vars: &HashMap<String, String>) -> Option<String> {
        non_empty(vars, env::ENVIRONMENT).or_else(|| non_empty(vars, env::APP_ENVIRONMENT))
    }
}

fn non_empty(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    vars.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
