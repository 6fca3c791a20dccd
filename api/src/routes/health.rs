use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::middleware::OptionalAuth;

/// Handler for GET /health
///
/// Reports 503 when the revocation store does not answer, since no session
/// can be validated without it.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (mut response, status, store) = match state.tokens.check_store().await {
        Ok(()) => (HttpResponse::Ok(), "healthy", "up"),
        Err(e) => {
            tracing::warn!(error = %e, "Revocation store failed health check");
            (HttpResponse::ServiceUnavailable(), "unhealthy", "unavailable")
        }
    };

    response.json(serde_json::json!({
        "status": status,
        "service": "atlas-api",
        "version": env!("CARGO_PKG_VERSION"),
        "revocation_store": store,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Handler for GET /
///
/// Public; reports whether the caller carries a usable admin session.
pub async fn index(auth: OptionalAuth) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "atlas-api",
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": auth.0.is_some(),
    }))
}
