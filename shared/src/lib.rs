//! Shared configuration and response types for the Atlas auth service
//!
//! This crate holds the pieces every other workspace member needs:
//! - Configuration types and the layered configuration loader
//! - The JSON error body returned by the HTTP layer

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, ConfigError, CookieConfig, CorsConfig, Environment,
    JwtConfig, LoggingConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
