use actix_web::{web, HttpResponse};
use validator::Validate;

use atlas_core::domain::entities::identity::IdentityClass;
use atlas_core::services::auth::RegisterIdentity;

use crate::app::AppState;
use crate::dto::auth::{IdentityResponse, RegisterRequest};
use crate::handlers::ApiError;

/// Handler for POST /register/
///
/// Creates an administrator. Responds 201 with the identity, 409 when the
/// email or login is taken and 400 on invalid input.
pub async fn register_admin(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    register(&state, IdentityClass::Admin, request.into_inner(), None).await
}

/// Handler for POST /user_register/{project_id}
pub async fn register_user(
    state: web::Data<AppState>,
    project_id: web::Path<i64>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    register(
        &state,
        IdentityClass::User,
        request.into_inner(),
        Some(project_id.into_inner()),
    )
    .await
}

async fn register(
    state: &AppState,
    class: IdentityClass,
    request: RegisterRequest,
    project_id: Option<i64>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let identity = state
        .auth
        .register(
            class,
            RegisterIdentity {
                email: request.email,
                login: request.login,
                password: request.password,
                project_id,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(IdentityResponse::from(identity)))
}
