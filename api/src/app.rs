//! Application state and factory
//!
//! This module wires the revocation store, identity store and password hasher
//! into the services and provides the factory for creating the Actix-web
//! application.

use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use atlas_core::domain::entities::identity::IdentityClass;
use atlas_core::errors::DomainResult;
use atlas_core::repositories::{IdentityRepository, RevocationStore};
use atlas_core::services::auth::{AuthService, PasswordHasher};
use atlas_core::services::session::SessionResolver;
use atlas_core::services::token::{TokenService, TokenServiceConfig};
use atlas_shared::config::{AuthConfig, CookieConfig, CorsConfig};

use crate::middleware::{create_cors, SessionAuth};
use crate::routes;

/// Shared services handed to every handler
pub struct AppState {
    pub tokens: Arc<TokenService<dyn RevocationStore>>,
    pub sessions: SessionResolver<dyn RevocationStore, dyn IdentityRepository>,
    pub auth: AuthService<dyn RevocationStore, dyn IdentityRepository, dyn PasswordHasher>,
    pub cookies: CookieConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RevocationStore>,
        identities: Arc<dyn IdentityRepository>,
        hasher: Arc<dyn PasswordHasher>,
        config: &AuthConfig,
    ) -> DomainResult<Self> {
        let token_config = TokenServiceConfig::from_auth_config(config)?;
        Ok(Self::with_token_config(
            store,
            identities,
            hasher,
            token_config,
            config.cookies.clone(),
        ))
    }

    pub fn with_token_config(
        store: Arc<dyn RevocationStore>,
        identities: Arc<dyn IdentityRepository>,
        hasher: Arc<dyn PasswordHasher>,
        token_config: TokenServiceConfig,
        cookies: CookieConfig,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(store, token_config));
        Self {
            sessions: SessionResolver::new(Arc::clone(&tokens), Arc::clone(&identities)),
            auth: AuthService::new(Arc::clone(&tokens), identities, hasher),
            tokens,
            cookies,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
    cors: &CorsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(routes::health::health_check))
        .route(
            "/",
            web::get()
                .to(routes::health::index)
                .wrap(SessionAuth::optional(IdentityClass::Admin)),
        )
        .service(web::scope("/api/v1/AuthService").configure(routes::auth::configure))
        .default_service(web::route().to(not_found))
}

fn json_error(err: actix_web::error::JsonPayloadError, _: &actix_web::HttpRequest) -> actix_web::Error {
    let body = atlas_shared::ErrorResponse::new(
        atlas_shared::error_codes::VALIDATION_ERROR,
        format!("Invalid JSON body: {}", err),
    );
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
