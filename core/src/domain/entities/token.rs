//! Token entities for JWT-based session authentication.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::IdentityClass;

/// Value of `token_type` in every token response
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// Whether a token grants access or may only be exchanged for a new pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
///
/// `exp` and `jti` are mandatory on the wire: a token missing either does not
/// deserialize and is treated as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (string form of the identity id)
    pub sub: String,

    /// Token kind
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// JWT ID, the revocation key
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Identity class the token was issued for; absent on unscoped tokens
    #[serde(rename = "cls", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<IdentityClass>,
}

impl Claims {
    /// Creates claims with a fresh id that expire `ttl_seconds` from now
    pub fn new(subject: impl Into<String>, kind: TokenKind, ttl_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject.into(),
            kind,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_seconds,
            class: None,
        }
    }

    /// Scope the claims to one identity class
    pub fn with_class(mut self, class: Option<IdentityClass>) -> Self {
        self.class = class;
        self
    }

    /// Whether these claims may authenticate an identity of `class`
    ///
    /// Unscoped claims are accepted for either class.
    pub fn allows_class(&self, class: IdentityClass) -> bool {
        self.class.map_or(true, |issued_for| issued_for == class)
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Seconds until `exp`, never less than one
    ///
    /// Used as the TTL for blacklist entries so an entry outlives the token
    /// it blocks and then disappears on its own.
    pub fn remaining_ttl(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        remaining.max(1) as u64
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        }
    }
}
