//! Token cookies for browser clients

use actix_web::cookie::{time::Duration, Cookie, SameSite};

use atlas_core::domain::entities::identity::IdentityClass;
use atlas_core::domain::entities::token::TokenPair;
use atlas_core::services::token::TokenServiceConfig;
use atlas_shared::config::CookieConfig;

/// Access and refresh cookies for `class`
///
/// Both cookies live as long as the refresh token. An expired access token
/// must still reach the server so the session can be refreshed silently.
pub fn token_cookies(
    class: IdentityClass,
    pair: &TokenPair,
    config: &CookieConfig,
    lifetimes: &TokenServiceConfig,
) -> [Cookie<'static>; 2] {
    let max_age = lifetimes.refresh_ttl_seconds;
    [
        build(class.access_cookie(), pair.access_token.clone(), config, max_age),
        build(class.refresh_cookie(), pair.refresh_token.clone(), config, max_age),
    ]
}

/// Cookies that make the browser drop both tokens of `class`
pub fn removal_cookies(class: IdentityClass, config: &CookieConfig) -> [Cookie<'static>; 2] {
    [class.access_cookie(), class.refresh_cookie()].map(|name| {
        let mut cookie = build(name, String::new(), config, 0);
        cookie.make_removal();
        cookie
    })
}

fn build(name: &'static str, value: String, config: &CookieConfig, max_age: i64) -> Cookie<'static> {
    Cookie::build(name, value)
        .path(config.path.clone())
        .secure(config.secure)
        .http_only(config.http_only)
        .same_site(same_site(&config.same_site))
        .max_age(Duration::seconds(max_age))
        .finish()
}

fn same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "lax" => SameSite::Lax,
        "none" => SameSite::None,
        _ => SameSite::Strict,
    }
}
