//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `marketplace.toml` (or the file named by `MARKETPLACE_CONFIG`), then
//! `MARKETPLACE__*` environment variables, e.g. `MARKETPLACE__SERVER__PORT=8080`
//! or `MARKETPLACE__AUTH__JWT_SECRET=...`.
//!
//! Database settings are read separately by
//! [`common::database::DatabaseConfig::from_env`].

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "MARKETPLACE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageBackend,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where users and projects are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    /// Process-local; contents vanish on restart
    Memory,
}

/// Identity provider token settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// RS256 public key, inline PEM or path to a PEM file
    pub jwt_public_key: Option<String>,
    /// HS256 shared secret, used when no public key is set
    pub jwt_secret: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default file, `MARKETPLACE_CONFIG` and the
    /// environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::from_sources(path.as_deref())
    }

    /// An explicitly named file must exist; the default `marketplace.*` file is
    /// optional.
    pub fn from_sources(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("marketplace").required(false),
        };

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("storage", "postgres")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("MARKETPLACE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
