//! Authentication route handlers
//!
//! Admin routes live directly under the scope; project user routes carry the
//! project id in the path or a `user/` prefix.

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;

use actix_web::{web, HttpRequest, HttpResponseBuilder};

use atlas_core::domain::entities::identity::IdentityClass;
use atlas_core::domain::entities::token::TokenPair;

use crate::app::AppState;
use crate::middleware::{cookies, SessionAuth};

/// Mount every authentication route on `cfg`
pub fn configure(cfg: &mut web::ServiceConfig) {
    let admin = IdentityClass::Admin;
    let user = IdentityClass::User;

    cfg.route("/register/", web::post().to(register::register_admin))
        .route("/login/", web::post().to(login::login_admin))
        .route("/refresh", web::post().to(refresh::refresh_admin))
        .route("/logout", web::post().to(logout::logout_admin))
        .route(
            "/logout_all",
            web::post()
                .to(logout::logout_all_admin)
                .wrap(SessionAuth::required(admin)),
        )
        .route("/me", web::get().to(me::me).wrap(SessionAuth::required(admin)))
        .route("/user_register/{project_id}", web::post().to(register::register_user))
        .route("/user_login/{project_id}", web::post().to(login::login_user))
        .route("/user/refresh", web::post().to(refresh::refresh_user))
        .route("/user/logout", web::post().to(logout::logout_user))
        .route(
            "/user/logout_all",
            web::post()
                .to(logout::logout_all_user)
                .wrap(SessionAuth::required(user)),
        )
        .route("/user/me", web::get().to(me::me).wrap(SessionAuth::required(user)));
}

/// Put both token cookies of `class` on a response
fn with_token_cookies<'a>(
    builder: &'a mut HttpResponseBuilder,
    state: &AppState,
    class: IdentityClass,
    pair: &TokenPair,
) -> &'a mut HttpResponseBuilder {
    for cookie in cookies::token_cookies(class, pair, &state.cookies, state.tokens.config()) {
        builder.cookie(cookie);
    }
    builder
}

/// Clear both token cookies of `class`
fn without_token_cookies<'a>(
    builder: &'a mut HttpResponseBuilder,
    state: &AppState,
    class: IdentityClass,
) -> &'a mut HttpResponseBuilder {
    for cookie in cookies::removal_cookies(class, &state.cookies) {
        builder.cookie(cookie);
    }
    builder
}

fn cookie_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.trim().is_empty())
}
