use actix_web::{web, HttpResponse};
use validator::Validate;

use atlas_core::domain::entities::identity::IdentityClass;

use crate::app::AppState;
use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::handlers::ApiError;

use super::with_token_cookies;

/// Handler for POST /login/
///
/// Sets the admin token cookies and echoes the pair in the body.
///
/// ## Errors
/// - 400 Bad Request: Invalid body
/// - 401 Unauthorized: Unknown email or wrong password
pub async fn login_admin(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    login(&state, IdentityClass::Admin, request.into_inner(), None).await
}

/// Handler for POST /user_login/{project_id}
pub async fn login_user(
    state: web::Data<AppState>,
    project_id: web::Path<i64>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    login(
        &state,
        IdentityClass::User,
        request.into_inner(),
        Some(project_id.into_inner()),
    )
    .await
}

async fn login(
    state: &AppState,
    class: IdentityClass,
    request: LoginRequest,
    project_id: Option<i64>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let (_, pair) = state
        .auth
        .login(class, &request.email, &request.password, project_id)
        .await?;

    Ok(with_token_cookies(&mut HttpResponse::Ok(), state, class, &pair)
        .json(TokenResponse::from(pair)))
}
