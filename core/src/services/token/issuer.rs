//! Access and refresh token minting.

use crate::domain::entities::identity::IdentityClass;
use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::errors::DomainError;
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::keys::refresh_key;

/// Mints tokens and registers refresh tokens as active
pub struct TokenIssuer<'a> {
    codec: &'a TokenCodec,
    store: &'a dyn RevocationStore,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl<'a> TokenIssuer<'a> {
    pub fn new(
        codec: &'a TokenCodec,
        store: &'a dyn RevocationStore,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
    ) -> Self {
        Self {
            codec,
            store,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// Access token with the configured lifetime
    pub fn issue_access_token(&self, subject: &str) -> Result<String, DomainError> {
        self.issue_access_token_with_ttl(subject, self.access_ttl_seconds)
    }

    /// Access token valid for `ttl_seconds`; nothing is written to the store
    pub fn issue_access_token_with_ttl(
        &self,
        subject: &str,
        ttl_seconds: i64,
    ) -> Result<String, DomainError> {
        self.access(subject, None, ttl_seconds)
    }

    /// Refresh token with the configured lifetime
    pub async fn issue_refresh_token(&self, subject: &str) -> Result<String, DomainError> {
        self.issue_refresh_token_with_ttl(subject, self.refresh_ttl_seconds)
            .await
    }

    /// Refresh token valid for `ttl_seconds`
    ///
    /// The token is only returned once its active entry has been written; a
    /// failed write fails the whole operation.
    pub async fn issue_refresh_token_with_ttl(
        &self,
        subject: &str,
        ttl_seconds: i64,
    ) -> Result<String, DomainError> {
        self.refresh(subject, None, ttl_seconds).await
    }

    /// Fresh access and refresh token for `subject`
    pub async fn issue_pair(&self, subject: &str) -> Result<TokenPair, DomainError> {
        self.issue_pair_for(subject, None).await
    }

    /// Fresh pair whose claims are scoped to `class` when one is given
    pub async fn issue_pair_for(
        &self,
        subject: &str,
        class: Option<IdentityClass>,
    ) -> Result<TokenPair, DomainError> {
        let access_token = self.access(subject, class, self.access_ttl_seconds)?;
        let refresh_token = self.refresh(subject, class, self.refresh_ttl_seconds).await?;
        Ok(TokenPair::new(access_token, refresh_token))
    }

    fn access(
        &self,
        subject: &str,
        class: Option<IdentityClass>,
        ttl_seconds: i64,
    ) -> Result<String, DomainError> {
        let claims = Claims::new(subject, TokenKind::Access, ttl_seconds).with_class(class);
        Ok(self.codec.encode(&claims)?)
    }

    async fn refresh(
        &self,
        subject: &str,
        class: Option<IdentityClass>,
        ttl_seconds: i64,
    ) -> Result<String, DomainError> {
        let claims = Claims::new(subject, TokenKind::Refresh, ttl_seconds).with_class(class);
        let token = self.codec.encode(&claims)?;

        self.store
            .set_with_expiry(&refresh_key(&claims.jti), subject, ttl_seconds.max(1) as u64)
            .await?;

        tracing::debug!(subject, jti = %claims.jti, class = ?class, "Issued refresh token");
        Ok(token)
    }
}
