//! Registration, login and token exchange for admins and project users

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::domain::entities::identity::{Identity, IdentityClass, IdentityFilter, NewIdentity};
use crate::domain::entities::token::TokenPair;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{IdentityRepository, RevocationStore};
use crate::services::token::TokenService;

use super::password::PasswordHasher;

/// Length of the random password given to identities created from a verified email
const UNUSABLE_PASSWORD_LENGTH: usize = 48;

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterIdentity {
    pub email: String,
    pub login: String,
    pub password: String,
    /// Must be `None` for admins and `Some` for users
    pub project_id: Option<i64>,
}

/// Authentication service for credential checks and token exchange
pub struct AuthService<S, I, H>
where
    S: RevocationStore + ?Sized,
    I: IdentityRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    tokens: Arc<TokenService<S>>,
    identities: Arc<I>,
    hasher: Arc<H>,
}

impl<S, I, H> AuthService<S, I, H>
where
    S: RevocationStore + ?Sized,
    I: IdentityRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub fn new(tokens: Arc<TokenService<S>>, identities: Arc<I>, hasher: Arc<H>) -> Self {
        Self {
            tokens,
            identities,
            hasher,
        }
    }

    /// Create an identity of `class`
    ///
    /// Email and login must each be unique within the class and project.
    ///
    /// # Returns
    /// * `Err(AuthError::IdentityExists)` - Email or login already taken
    /// * `Err(DomainError::Validation)` - Project id does not fit the class
    pub async fn register(
        &self,
        class: IdentityClass,
        input: RegisterIdentity,
    ) -> DomainResult<Identity> {
        check_scope(class, input.project_id)?;

        let by_email = IdentityFilter::by_email(class, &input.email, input.project_id);
        if self.identities.find_by_filter(&by_email).await?.is_some() {
            return Err(AuthError::IdentityExists {
                field: "email".to_string(),
            }
            .into());
        }

        let by_login = IdentityFilter::by_login(class, &input.login, input.project_id);
        if self.identities.find_by_filter(&by_login).await?.is_some() {
            return Err(AuthError::IdentityExists {
                field: "login".to_string(),
            }
            .into());
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let identity = self
            .identities
            .insert(NewIdentity {
                class,
                email: input.email,
                login: input.login,
                password_hash,
                project_id: input.project_id,
                role: default_role(class).to_string(),
            })
            .await?;

        tracing::info!(%class, identity_id = identity.id, project_id = ?identity.project_id, "Identity registered");
        Ok(identity)
    }

    /// Check a password and start a session
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(
        &self,
        class: IdentityClass,
        email: &str,
        password: &str,
        project_id: Option<i64>,
    ) -> DomainResult<(Identity, TokenPair)> {
        check_scope(class, project_id)?;

        let filter = IdentityFilter::by_email(class, email, project_id);
        let Some(identity) = self.identities.find_by_filter(&filter).await? else {
            tracing::info!(%class, ?project_id, "Login for unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self.hasher.verify(password, &identity.password_hash)? {
            tracing::info!(%class, identity_id = identity.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let pair = self
            .tokens
            .issuer()
            .issue_pair_for(&identity.subject(), Some(class))
            .await?;
        tracing::info!(%class, identity_id = identity.id, "Login succeeded");
        Ok((identity, pair))
    }

    /// Start a session for an email an external provider has already verified
    ///
    /// Creates the identity on first use with a random password that is never
    /// disclosed, so password login stays closed for it.
    pub async fn sign_in_verified_email(
        &self,
        class: IdentityClass,
        email: &str,
        project_id: Option<i64>,
    ) -> DomainResult<(Identity, TokenPair)> {
        check_scope(class, project_id)?;

        let filter = IdentityFilter::by_email(class, email, project_id);
        let identity = match self.identities.find_by_filter(&filter).await? {
            Some(identity) => identity,
            None => {
                let password_hash = self.hasher.hash(&unusable_password())?;
                let identity = self
                    .identities
                    .insert(NewIdentity {
                        class,
                        email: email.to_string(),
                        login: email.to_string(),
                        password_hash,
                        project_id,
                        role: default_role(class).to_string(),
                    })
                    .await?;
                tracing::info!(%class, identity_id = identity.id, "Identity created from verified email");
                identity
            }
        };

        let pair = self
            .tokens
            .issuer()
            .issue_pair_for(&identity.subject(), Some(class))
            .await?;
        Ok((identity, pair))
    }

    /// Exchange a refresh token for a new pair
    ///
    /// A token scoped to another class is refused without being redeemed.
    ///
    /// # Returns
    /// The new pair and the subject it was issued for
    pub async fn refresh(
        &self,
        class: IdentityClass,
        refresh_token: &str,
    ) -> DomainResult<(TokenPair, String)> {
        let (pair, claims) = self.tokens.rotate_for(refresh_token, Some(class)).await?;
        Ok((pair, claims.sub))
    }

    /// Revoke whichever of the two tokens were presented
    ///
    /// # Returns
    /// `true` if at least one token was revoked
    pub async fn logout(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> DomainResult<bool> {
        let revocations = self.tokens.revocations();
        let mut revoked = false;

        for token in [access_token, refresh_token].into_iter().flatten() {
            revoked |= revocations.revoke(token).await?;
        }

        Ok(revoked)
    }

    /// Revoke every refresh token of `subject`
    pub async fn logout_all(&self, subject: &str) -> DomainResult<usize> {
        self.tokens.revocations().revoke_all(subject).await
    }
}

fn check_scope(class: IdentityClass, project_id: Option<i64>) -> Result<(), DomainError> {
    match (class, project_id) {
        (IdentityClass::Admin, None) | (IdentityClass::User, Some(_)) => Ok(()),
        (IdentityClass::Admin, Some(_)) => Err(DomainError::Validation {
            message: "admins do not belong to a project".to_string(),
        }),
        (IdentityClass::User, None) => Err(DomainError::Validation {
            message: "users must belong to a project".to_string(),
        }),
    }
}

fn default_role(class: IdentityClass) -> &'static str {
    match class {
        IdentityClass::Admin => "admin",
        IdentityClass::User => "user",
    }
}

fn unusable_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UNUSABLE_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
