//! Token validation against signature, expiry and the blacklist.

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::keys::blacklist_key;

pub struct TokenValidator<'a> {
    codec: &'a TokenCodec,
    store: &'a dyn RevocationStore,
}

impl<'a> TokenValidator<'a> {
    pub fn new(codec: &'a TokenCodec, store: &'a dyn RevocationStore) -> Self {
        Self { codec, store }
    }

    /// Decode `token` and reject it if its id is blacklisted
    ///
    /// Tokens that fail to decode never reach the store, so an expired token
    /// reports `Expired` even when it was also revoked.
    pub async fn validate(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.codec.decode(token)?;

        if self.store.exists(&blacklist_key(&claims.jti)).await? {
            tracing::debug!(subject = %claims.sub, jti = %claims.jti, "Rejected blacklisted token");
            return Err(TokenError::Revoked.into());
        }

        Ok(claims)
    }

    /// Like `validate`, additionally requiring the given kind
    pub async fn validate_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, DomainError> {
        let claims = self.validate(token).await?;
        if claims.kind != kind {
            return Err(TokenError::WrongKind.into());
        }
        Ok(claims)
    }
}
