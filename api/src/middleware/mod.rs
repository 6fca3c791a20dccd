pub mod auth;
pub mod cookies;
pub mod cors;

pub use auth::{AuthContext, OptionalAuth, SessionAuth};
pub use cors::create_cors;
