use actix_web::{web, HttpRequest, HttpResponse};

use atlas_core::domain::entities::identity::IdentityClass;
use atlas_core::errors::{AuthError, DomainError};

use crate::app::AppState;
use crate::dto::auth::{RefreshTokenRequest, TokenResponse};
use crate::handlers::ApiError;

use super::{cookie_value, with_token_cookies};

/// Handler for POST /refresh
///
/// Redeems the refresh token from the body, or from the admin refresh cookie,
/// for a new pair. A refresh token can be redeemed exactly once.
///
/// ## Errors
/// - 401 Unauthorized: Missing, expired, revoked or already redeemed token
pub async fn refresh_admin(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, ApiError> {
    refresh(&req, &state, IdentityClass::Admin, request).await
}

/// Handler for POST /user/refresh
pub async fn refresh_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, ApiError> {
    refresh(&req, &state, IdentityClass::User, request).await
}

async fn refresh(
    req: &HttpRequest,
    state: &AppState,
    class: IdentityClass,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, ApiError> {
    let token = request
        .and_then(|body| body.into_inner().refresh_token)
        .filter(|t| !t.trim().is_empty())
        .or_else(|| cookie_value(req, class.refresh_cookie()))
        .ok_or_else(|| DomainError::from(AuthError::Unauthenticated))?;

    let (pair, subject) = state.auth.refresh(class, &token).await?;
    tracing::debug!(%class, %subject, "Token pair refreshed");

    Ok(with_token_cookies(&mut HttpResponse::Ok(), state, class, &pair)
        .json(TokenResponse::from(pair)))
}
