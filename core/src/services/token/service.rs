//! Token service: one codec and one bounded store shared by every component

use std::sync::Arc;

use crate::domain::entities::identity::IdentityClass;
use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{BoundedStore, RevocationStore};

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::keys::refresh_key;
use super::revocation::RevocationManager;
use super::validator::TokenValidator;

/// Entry point for the token lifecycle
///
/// The store handle is injected once at startup. Every call made through the
/// components handed out here runs under the configured store deadline.
pub struct TokenService<S: RevocationStore + ?Sized> {
    codec: TokenCodec,
    store: BoundedStore<S>,
    config: TokenServiceConfig,
}

impl<S: RevocationStore + ?Sized> TokenService<S> {
    pub fn new(store: Arc<S>, config: TokenServiceConfig) -> Self {
        Self {
            codec: TokenCodec::new(&config),
            store: BoundedStore::new(store, config.store_timeout),
            config,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn issuer(&self) -> TokenIssuer<'_> {
        TokenIssuer::new(
            &self.codec,
            &self.store,
            self.config.access_ttl_seconds,
            self.config.refresh_ttl_seconds,
        )
    }

    pub fn validator(&self) -> TokenValidator<'_> {
        TokenValidator::new(&self.codec, &self.store)
    }

    pub fn revocations(&self) -> RevocationManager<'_> {
        RevocationManager::new(
            &self.codec,
            &self.store,
            self.config.refresh_ttl_seconds,
            self.config.scan_batch_size,
        )
    }

    /// Validate a refresh token that must still be in the active set
    pub async fn validate_active_refresh(&self, refresh_token: &str) -> Result<Claims, DomainError> {
        let claims = self
            .validator()
            .validate_kind(refresh_token, TokenKind::Refresh)
            .await?;

        if !self.store.exists(&refresh_key(&claims.jti)).await? {
            tracing::debug!(subject = %claims.sub, jti = %claims.jti, "Refresh token is not active");
            return Err(TokenError::Revoked.into());
        }

        Ok(claims)
    }

    /// Exchange a refresh token for a new pair for the same subject
    ///
    /// The presented token is redeemed before the new pair is minted, so at
    /// most one concurrent caller receives a pair.
    pub async fn rotate(&self, refresh_token: &str) -> Result<(TokenPair, Claims), DomainError> {
        self.rotate_for(refresh_token, None).await
    }

    /// Like [`rotate`](Self::rotate), but a token scoped to another class than
    /// `class` fails with `WrongClass` and stays redeemable
    ///
    /// The new pair keeps the class scope of the redeemed token.
    pub async fn rotate_for(
        &self,
        refresh_token: &str,
        class: Option<IdentityClass>,
    ) -> Result<(TokenPair, Claims), DomainError> {
        let claims = self.validate_active_refresh(refresh_token).await?;
        if let Some(class) = class {
            if !claims.allows_class(class) {
                tracing::warn!(subject = %claims.sub, %class, issued_for = ?claims.class, "Refresh token presented for another class");
                return Err(TokenError::WrongClass.into());
            }
        }
        self.revocations().redeem(&claims).await?;
        let pair = self.issuer().issue_pair_for(&claims.sub, claims.class).await?;

        tracing::info!(subject = %claims.sub, "Rotated refresh token");
        Ok((pair, claims))
    }

    /// Whether the revocation store answers within the store deadline
    pub async fn check_store(&self) -> Result<(), DomainError> {
        self.store.ping().await
    }
}
