use actix_web::{web, HttpRequest, HttpResponse};

use atlas_core::domain::entities::identity::IdentityClass;

use crate::app::AppState;
use crate::dto::auth::{LogoutAllResponse, LogoutResponse, RefreshTokenRequest};
use crate::handlers::ApiError;
use crate::middleware::auth::{extract_bearer_token, AuthContext};

use super::{cookie_value, without_token_cookies};

/// Handler for POST /logout
///
/// Revokes whichever admin tokens the caller presents and clears the cookies.
/// Succeeds even when nothing was presented.
pub async fn logout_admin(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, ApiError> {
    logout(&req, &state, IdentityClass::Admin, request).await
}

/// Handler for POST /user/logout
pub async fn logout_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, ApiError> {
    logout(&req, &state, IdentityClass::User, request).await
}

async fn logout(
    req: &HttpRequest,
    state: &AppState,
    class: IdentityClass,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, ApiError> {
    let access_token =
        cookie_value(req, class.access_cookie()).or_else(|| extract_bearer_token(req.headers()));
    let refresh_token = request
        .and_then(|body| body.into_inner().refresh_token)
        .filter(|t| !t.trim().is_empty())
        .or_else(|| cookie_value(req, class.refresh_cookie()));

    let revoked = state
        .auth
        .logout(access_token.as_deref(), refresh_token.as_deref())
        .await?;

    Ok(without_token_cookies(&mut HttpResponse::Ok(), state, class).json(LogoutResponse {
        message: "Logged out successfully".to_string(),
        revoked,
    }))
}

/// Handler for POST /logout_all
///
/// Revokes every refresh token of the authenticated admin.
pub async fn logout_all_admin(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    logout_all(&state, IdentityClass::Admin, auth).await
}

/// Handler for POST /user/logout_all
pub async fn logout_all_user(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    logout_all(&state, IdentityClass::User, auth).await
}

async fn logout_all(
    state: &AppState,
    class: IdentityClass,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    let revoked_sessions = state.auth.logout_all(auth.subject()).await?;
    // The access token in hand stays valid until it expires unless revoked too
    state.tokens.revocations().revoke_claims(&auth.claims).await?;

    Ok(without_token_cookies(&mut HttpResponse::Ok(), state, class).json(LogoutAllResponse {
        message: "Logged out of all sessions".to_string(),
        revoked_sessions,
    }))
}
