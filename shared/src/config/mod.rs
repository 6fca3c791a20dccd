//! Configuration module
//!
//! - `auth` - Token signing, revocation store limits and cookie attributes
//! - `cache` - Redis connection configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration

pub mod auth;
pub mod cache;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthConfig, CookieConfig, JwtConfig, DEFAULT_JWT_SECRET};
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Prefix for layered environment overrides, e.g. `ATLAS__AUTH__JWT__SECRET`
pub const ENV_PREFIX: &str = "ATLAS";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            auth: AuthConfig {
                cookies: CookieConfig {
                    secure: false,
                    ..Default::default()
                },
                ..Default::default()
            },
            cors: CorsConfig::development(),
            logging: LoggingConfig::for_environment(Environment::Development),
            ..Default::default()
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            logging: LoggingConfig::for_environment(Environment::Production),
            ..Default::default()
        }
    }

    /// Base configuration for an environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => Self {
                environment: Environment::Staging,
                logging: LoggingConfig::for_environment(Environment::Staging),
                ..Self::production()
            },
        }
    }

    /// Load layered configuration
    ///
    /// Order of precedence, lowest first: built-in defaults for the detected
    /// environment, an optional `config.<environment>.toml`, then `ATLAS__`
    /// prefixed environment variables. `.env` is read before anything else.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let env = Environment::from_env();
        let defaults = Self::for_environment(env);

        let loaded: Self = ::config::Config::builder()
            .add_source(::config::Config::try_from(&defaults)?)
            .add_source(::config::File::with_name(env.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Build from the flat variables used by older deployments
    /// (`JWT_SECRET`, `REDIS_URL`, `SERVER_PORT`, `CORS_ORIGINS`, ...)
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let env = Environment::from_env();
        let base = Self::for_environment(env);

        let cors = match std::env::var("CORS_ORIGINS") {
            Ok(_) => CorsConfig::from_env(),
            Err(_) => base.cors.clone(),
        };

        let config = Self {
            environment: env,
            server: ServerConfig::from_env(),
            auth: AuthConfig {
                cookies: base.auth.cookies.clone(),
                ..AuthConfig::from_env()
            },
            cache: CacheConfig::from_env(),
            cors,
            logging: base.logging,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that must never reach a running server
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err(ConfigError::Invalid(
                "the default JWT secret cannot be used in production".to_string(),
            ));
        }
        if self.auth.jwt.secret.is_empty() {
            return Err(ConfigError::Invalid("JWT secret must not be empty".to_string()));
        }
        if !matches!(self.auth.jwt.algorithm.as_str(), "HS256" | "HS384" | "HS512") {
            return Err(ConfigError::Invalid(format!(
                "unsupported JWT algorithm: {}",
                self.auth.jwt.algorithm
            )));
        }
        if self.auth.scan_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "scan batch size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults_are_valid() {
        let config = AppConfig::development();
        assert!(config.validate().is_ok());
        assert!(!config.auth.cookies.secure);
    }

    #[test]
    fn test_development_defaults_carry_store_limits() {
        let config = AppConfig::development();
        assert_eq!(config.auth.store_timeout_ms, 2000);
        assert_eq!(config.auth.scan_batch_size, 100);
    }

    #[test]
    fn test_load_succeeds_without_overrides() {
        if Environment::from_env().is_production() {
            return;
        }
        let config = AppConfig::load().expect("default configuration should load");
        assert!(config.auth.scan_batch_size > 0);
        assert!(config.auth.store_timeout_ms > 0);
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let config = AppConfig::production();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::production();
        config.auth.jwt = JwtConfig::new("a-real-secret");
        assert!(config.validate().is_ok());
        assert!(config.auth.cookies.secure);
    }

    #[test]
    fn test_rejects_asymmetric_algorithm() {
        let mut config = AppConfig::development();
        config.auth.jwt.algorithm = "RS256".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_staging_uses_production_server_settings() {
        let config = AppConfig::for_environment(Environment::Staging);
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
