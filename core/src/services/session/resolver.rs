//! Request-time session resolution with transparent refresh rotation

use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::identity::{Identity, IdentityClass};
use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{IdentityRepository, RevocationStore};
use crate::services::token::TokenService;

/// Whether a route may proceed without an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    Required,
    Optional,
}

/// Outcome of resolving one request's credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No access token was presented
    NoCredential,
    ValidAccess,
    /// Access token unusable; refresh token redeemed and a new pair minted
    ExpiredAccessValidRefresh,
    /// Access token unusable and no usable refresh token
    ExpiredAccessInvalidRefresh,
    /// The revocation store failed; never proceeds, not even anonymously
    Rejected,
}

/// Tokens presented by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Pick the access token from its two transports
    ///
    /// The class cookie wins over the `Authorization` header. The refresh
    /// token only ever travels in a cookie.
    pub fn from_transport(
        access_cookie: Option<String>,
        bearer: Option<String>,
        refresh_cookie: Option<String>,
    ) -> Self {
        Self {
            access_token: non_empty(access_cookie).or_else(|| non_empty(bearer)),
            refresh_token: non_empty(refresh_cookie),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub class: IdentityClass,
    pub credentials: Credentials,
    pub requirement: AuthRequirement,
}

/// Resolved session
///
/// `identity` is `None` only for anonymous sessions on optional routes.
/// `rotated` carries the new pair the transport must hand back to the caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: SessionState,
    pub identity: Option<Identity>,
    pub claims: Option<Claims>,
    pub rotated: Option<TokenPair>,
}

impl Session {
    fn anonymous(state: SessionState) -> Self {
        Self {
            state,
            identity: None,
            claims: None,
            rotated: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

pub struct SessionResolver<S, I>
where
    S: RevocationStore + ?Sized,
    I: IdentityRepository + ?Sized,
{
    tokens: Arc<TokenService<S>>,
    identities: Arc<I>,
}

impl<S, I> SessionResolver<S, I>
where
    S: RevocationStore + ?Sized,
    I: IdentityRepository + ?Sized,
{
    pub fn new(tokens: Arc<TokenService<S>>, identities: Arc<I>) -> Self {
        Self { tokens, identities }
    }

    /// Resolve the caller's identity for `request.class`
    ///
    /// # Returns
    /// * `Ok(Session)` - Authenticated, or anonymous on an optional route
    /// * `Err(AuthError::Unauthenticated)` - Required route without a usable
    ///   credential, or any revocation store failure
    pub async fn resolve(&self, request: &SessionRequest) -> DomainResult<Session> {
        let Some(access_token) = request.credentials.access_token.as_deref() else {
            return self.deny(SessionState::NoCredential, request);
        };

        match self
            .tokens
            .validator()
            .validate_kind(access_token, TokenKind::Access)
            .await
        {
            Ok(claims) => {
                let identity = match self.load_identity(&claims, request.class).await? {
                    Some(identity) => identity,
                    None => return self.deny(SessionState::ValidAccess, request),
                };
                Ok(Session {
                    state: SessionState::ValidAccess,
                    identity: Some(identity),
                    claims: Some(claims),
                    rotated: None,
                })
            }
            Err(e) if e.is_fail_closed() => self.reject(e, request),
            Err(DomainError::Token(reason)) => {
                tracing::debug!(class = %request.class, %reason, "Access token unusable, trying refresh");
                self.refresh(request).await
            }
            Err(e) => Err(e),
        }
    }

    async fn refresh(&self, request: &SessionRequest) -> DomainResult<Session> {
        let Some(refresh_token) = request.credentials.refresh_token.as_deref() else {
            return self.deny(SessionState::ExpiredAccessInvalidRefresh, request);
        };

        let (pair, redeemed) = match self.tokens.rotate_for(refresh_token, Some(request.class)).await {
            Ok(rotated) => rotated,
            Err(e) if e.is_fail_closed() => return self.reject(e, request),
            Err(DomainError::Token(reason)) => {
                tracing::debug!(class = %request.class, %reason, "Refresh token unusable");
                return self.deny(SessionState::ExpiredAccessInvalidRefresh, request);
            }
            Err(e) => return Err(e),
        };

        let claims = self.tokens.codec().decode(&pair.access_token)?;
        let identity = match self.load_identity(&claims, request.class).await? {
            Some(identity) => identity,
            None => return self.deny(SessionState::ExpiredAccessInvalidRefresh, request),
        };

        tracing::info!(
            class = %request.class,
            subject = %claims.sub,
            redeemed_jti = %redeemed.jti,
            "Session refreshed"
        );
        Ok(Session {
            state: SessionState::ExpiredAccessValidRefresh,
            identity: Some(identity),
            claims: Some(claims),
            rotated: Some(pair),
        })
    }

    async fn load_identity(
        &self,
        claims: &Claims,
        class: IdentityClass,
    ) -> DomainResult<Option<Identity>> {
        if !claims.allows_class(class) {
            tracing::debug!(subject = %claims.sub, %class, issued_for = ?claims.class, "Token issued for another class");
            return Ok(None);
        }
        let Ok(subject_id) = claims.sub.parse::<i64>() else {
            tracing::debug!(subject = %claims.sub, "Token subject is not an identity id");
            return Ok(None);
        };
        self.identities.resolve(subject_id, class).await
    }

    fn deny(&self, state: SessionState, request: &SessionRequest) -> DomainResult<Session> {
        match request.requirement {
            AuthRequirement::Optional => Ok(Session::anonymous(state)),
            AuthRequirement::Required => {
                tracing::debug!(class = %request.class, ?state, "Authentication required");
                Err(AuthError::Unauthenticated.into())
            }
        }
    }

    fn reject(&self, cause: DomainError, request: &SessionRequest) -> DomainResult<Session> {
        tracing::error!(
            class = %request.class,
            state = ?SessionState::Rejected,
            error = %cause,
            "Rejecting request: revocation store unavailable"
        );
        Err(AuthError::Unauthenticated.into())
    }
}
