//! Service configuration
//!
//! Values come from built-in defaults, then an optional `config.toml`, then
//! `APP_`-prefixed environment variables using `__` as the section separator
//! (e.g. `APP_SERVER__PORT=8080`, `APP_AUTH__ACCESS_TOKEN_SECRET=...`).
//! The database itself is configured through `common::database::DatabaseConfig`.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which persistence adapter backs the services
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Shared HS256 secret used to verify access tokens
    pub access_token_secret: String,
}

/// Argon2 work factor
#[derive(Debug, Clone, Deserialize)]
pub struct HashingSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log_level: String,
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub auth: AuthSettings,
    pub hashing: HashingSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("log_level", "info")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3500)?
            .set_default("store.backend", "postgres")?
            .set_default("auth.access_token_secret", "")?
            .set_default("hashing.memory_kib", i64::from(argon2::Params::DEFAULT_M_COST))?
            .set_default("hashing.iterations", i64::from(argon2::Params::DEFAULT_T_COST))?
            .set_default("hashing.parallelism", i64::from(argon2::Params::DEFAULT_P_COST))?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        if settings.auth.access_token_secret.is_empty() {
            return Err(ConfigError::Message(
                "auth.access_token_secret must be set (APP_AUTH__ACCESS_TOKEN_SECRET)".to_string(),
            ));
        }

        Ok(settings)
    }
}
