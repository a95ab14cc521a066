//! Application configuration.
//!
//! Sources, lowest precedence first:
//! 1. TOML file (`--config` / `TRADELOG_CONFIG`, else `config/default.toml` if present)
//! 2. `TRADELOG_<SECTION>__<KEY>` variables, e.g. `TRADELOG_STORE__BACKEND=neon`
//! 3. Conventional variables: `PORT`, `DATABASE_URL`, `SUPABASE_URL`, `SUPABASE_KEY`

use std::collections::HashMap;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tradelog_api::ApiConfig;
use tradelog_store::StoreConfig;

use crate::error::{AppError, AppResult};

/// Config file used when none is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Conventional variable → config key.
const ENV_ALIASES: [(&str, &str); 4] = [
    ("PORT", "api.port"),
    ("DATABASE_URL", "store.database_url"),
    ("SUPABASE_URL", "store.supabase_url"),
    ("SUPABASE_KEY", "store.supabase_key"),
];

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Store backend settings.
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load from file and the process environment, then validate.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        Self::load_from(path, std::env::vars().collect())
    }

    /// Load from file and an explicit environment map, then validate.
    pub fn load_from(path: Option<&str>, env: HashMap<String, String>) -> AppResult<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let mut builder = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("TRADELOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            );

        for (var, key) in ENV_ALIASES {
            builder = builder.set_override_option(key, env.get(var).cloned())?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot serve a single request.
    pub fn validate(&self) -> AppResult<()> {
        self.store
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if self.api.body_limit_bytes == 0 {
            return Err(AppError::Config(
                "api.body_limit_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
