use actix_web::HttpResponse;

use crate::dto::auth::IdentityResponse;
use crate::middleware::AuthContext;

/// Handler for GET /me and GET /user/me
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(IdentityResponse::from(auth.identity))
}
