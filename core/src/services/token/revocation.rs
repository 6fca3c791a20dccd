//! Single-token revocation, one-time refresh redemption and bulk revocation.

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::keys::{
    blacklist_key, jti_from_refresh_key, refresh_key, BLACKLIST_MARKER, REFRESH_PATTERN,
};

pub struct RevocationManager<'a> {
    codec: &'a TokenCodec,
    store: &'a dyn RevocationStore,
    refresh_ttl_seconds: i64,
    scan_batch_size: usize,
}

impl<'a> RevocationManager<'a> {
    pub fn new(
        codec: &'a TokenCodec,
        store: &'a dyn RevocationStore,
        refresh_ttl_seconds: i64,
        scan_batch_size: usize,
    ) -> Self {
        Self {
            codec,
            store,
            refresh_ttl_seconds,
            scan_batch_size,
        }
    }

    /// Blacklist `token` until it would have expired
    ///
    /// # Returns
    /// * `Ok(true)` - The token is now blacklisted (also on repeated calls)
    /// * `Ok(false)` - The token did not decode, so there is nothing to revoke
    pub async fn revoke(&self, token: &str) -> Result<bool, DomainError> {
        let claims = match self.codec.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(reason = %e, "Skipped revocation of undecodable token");
                return Ok(false);
            }
        };

        self.revoke_claims(&claims).await?;
        Ok(true)
    }

    /// Blacklist already verified claims; refresh tokens also leave the
    /// active set
    pub async fn revoke_claims(&self, claims: &Claims) -> Result<(), DomainError> {
        self.store
            .set_with_expiry(&blacklist_key(&claims.jti), BLACKLIST_MARKER, claims.remaining_ttl())
            .await?;

        if claims.kind == TokenKind::Refresh {
            self.store.delete(&refresh_key(&claims.jti)).await?;
        }

        tracing::info!(subject = %claims.sub, jti = %claims.jti, kind = %claims.kind, "Token revoked");
        Ok(())
    }

    /// Consume a refresh token exactly once
    ///
    /// The active entry is removed with a single atomic delete. Whoever
    /// removes it wins; every other caller gets `Revoked`.
    pub async fn redeem(&self, claims: &Claims) -> Result<(), DomainError> {
        let removed = self.store.delete(&refresh_key(&claims.jti)).await?;
        if !removed {
            tracing::warn!(
                subject = %claims.sub,
                jti = %claims.jti,
                security_event = "refresh_token_reuse",
                "Refresh token presented after it was already used or revoked"
            );
            return Err(TokenError::Revoked.into());
        }

        self.store
            .set_with_expiry(&blacklist_key(&claims.jti), BLACKLIST_MARKER, claims.remaining_ttl())
            .await?;

        tracing::debug!(subject = %claims.sub, jti = %claims.jti, "Refresh token redeemed");
        Ok(())
    }

    /// Revoke every active refresh token owned by `subject`
    ///
    /// # Returns
    /// Number of refresh tokens revoked by this call
    pub async fn revoke_all(&self, subject: &str) -> Result<usize, DomainError> {
        let blacklist_ttl = self.refresh_ttl_seconds.max(1) as u64;
        let mut cursor = 0;
        let mut revoked = 0;

        loop {
            let (next, keys) = self
                .store
                .scan(cursor, REFRESH_PATTERN, self.scan_batch_size)
                .await?;

            for key in keys {
                let Some(jti) = jti_from_refresh_key(&key) else {
                    continue;
                };
                // Entries can vanish between the scan and the read.
                if self.store.get(&key).await?.as_deref() != Some(subject) {
                    continue;
                }

                self.store
                    .set_with_expiry(&blacklist_key(jti), BLACKLIST_MARKER, blacklist_ttl)
                    .await?;
                if self.store.delete(&key).await? {
                    revoked += 1;
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::info!(subject, revoked, "Revoked all refresh tokens");
        Ok(revoked)
    }
}
