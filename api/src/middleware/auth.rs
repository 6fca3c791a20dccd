//! Session middleware for the identity-scoped routes.
//!
//! Reads the class cookie or the `Authorization: Bearer` header, resolves the
//! session and stores an [`AuthContext`] in the request extensions. When the
//! access token had to be replaced, the rotated pair is written back as
//! `Set-Cookie` headers on the response.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use atlas_core::domain::entities::identity::{Identity, IdentityClass};
use atlas_core::domain::entities::token::Claims;
use atlas_core::errors::{AuthError, DomainError};
use atlas_core::services::session::{AuthRequirement, Credentials, SessionRequest, SessionState};

use crate::app::AppState;
use crate::handlers::ApiError;

use super::cookies;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: Identity,
    pub claims: Claims,
    pub state: SessionState,
}

impl AuthContext {
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }
}

/// Session middleware factory
///
/// Each scope is wrapped with the identity class it serves and whether an
/// anonymous caller may pass through.
#[derive(Debug, Clone, Copy)]
pub struct SessionAuth {
    class: IdentityClass,
    requirement: AuthRequirement,
}

impl SessionAuth {
    pub fn new(class: IdentityClass, requirement: AuthRequirement) -> Self {
        Self { class, requirement }
    }

    pub fn required(class: IdentityClass) -> Self {
        Self::new(class, AuthRequirement::Required)
    }

    pub fn optional(class: IdentityClass) -> Self {
        Self::new(class, AuthRequirement::Optional)
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            class: self.class,
            requirement: self.requirement,
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    class: IdentityClass,
    requirement: AuthRequirement,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let class = self.class;
        let requirement = self.requirement;

        Box::pin(async move {
            let state = req.app_data::<web::Data<AppState>>().cloned().ok_or_else(|| {
                tracing::error!("AppState is not registered; session middleware cannot run");
                ApiError::from(DomainError::internal("application state missing"))
            })?;

            let request = SessionRequest {
                class,
                credentials: credentials(&req, class),
                requirement,
            };
            let session = state.sessions.resolve(&request).await.map_err(ApiError::from)?;

            if let (Some(identity), Some(claims)) = (session.identity, session.claims) {
                req.extensions_mut().insert(AuthContext {
                    identity,
                    claims,
                    state: session.state,
                });
            }

            let mut res = service.call(req).await?;

            if let Some(pair) = session.rotated {
                let lifetimes = state.tokens.config();
                for cookie in cookies::token_cookies(class, &pair, &state.cookies, lifetimes) {
                    if let Err(e) = res.response_mut().add_cookie(&cookie) {
                        tracing::error!(cookie = cookie.name(), error = %e, "Failed to attach rotated token cookie");
                    }
                }
            }

            Ok(res)
        })
    }
}

fn credentials(req: &ServiceRequest, class: IdentityClass) -> Credentials {
    Credentials::from_transport(
        req.cookie(class.access_cookie()).map(|c| c.value().to_string()),
        extract_bearer_token(req.headers()),
        req.cookie(class.refresh_cookie()).map(|c| c.value().to_string()),
    )
}

/// Extracts Bearer token from Authorization header
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            ApiError::from(DomainError::from(AuthError::Unauthenticated)).into()
        });

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}
