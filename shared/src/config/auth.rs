//! Token signing and cookie transport configuration

use serde::{Deserialize, Serialize};

/// Placeholder secret shipped in defaults; production refuses to start with it
pub const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: u64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: u64,

    /// Signing algorithm name (HS256, HS384, HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: u64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: u64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// Attributes applied to token cookies
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieConfig {
    /// Cookie `Secure` flag (HTTPS only)
    #[serde(default = "default_true")]
    pub secure: bool,

    /// Cookie `HttpOnly` flag
    #[serde(default = "default_true")]
    pub http_only: bool,

    /// Cookie `SameSite` attribute (Strict, Lax, None)
    #[serde(default = "default_same_site")]
    pub same_site: String,

    /// Cookie path
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            http_only: true,
            same_site: default_same_site(),
            path: default_path(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Token cookie attributes
    #[serde(default)]
    pub cookies: CookieConfig,

    /// Per-call timeout for revocation store operations, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Page size used when scanning the active refresh set
    #[serde(default = "default_scan_batch_size")]
    pub scan_batch_size: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            cookies: CookieConfig::default(),
            store_timeout_ms: default_store_timeout_ms(),
            scan_batch_size: default_scan_batch_size(),
        }
    }
}

impl AuthConfig {
    /// Build from the flat environment variables used by older deployments
    pub fn from_env() -> Self {
        let mut jwt = JwtConfig::default();
        if let Ok(secret) = std::env::var("JWT_SECRET").or_else(|_| std::env::var("SECRET_KEY")) {
            jwt.secret = secret;
        }
        if let Ok(algorithm) = std::env::var("ALGORITHM") {
            jwt.algorithm = algorithm;
        }
        if let Some(minutes) = parse_var::<u64>("ACCESS_TOKEN_EXPIRE_MINUTES") {
            jwt = jwt.with_access_expiry_minutes(minutes);
        }
        if let Some(days) = parse_var::<u64>("REFRESH_TOKEN_EXPIRE_DAYS") {
            jwt = jwt.with_refresh_expiry_days(days);
        }

        Self {
            jwt,
            cookies: CookieConfig::default(),
            store_timeout_ms: parse_var("REVOCATION_STORE_TIMEOUT_MS")
                .unwrap_or_else(default_store_timeout_ms),
            scan_batch_size: default_scan_batch_size(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    30 * 86400 // 30 days
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_true() -> bool {
    true
}

fn default_same_site() -> String {
    String::from("Strict")
}

fn default_path() -> String {
    String::from("/")
}

fn default_store_timeout_ms() -> u64 {
    2000
}

fn default_scan_batch_size() -> usize {
    100
}
