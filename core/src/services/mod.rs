//! Business services containing domain logic and use cases.

pub mod auth;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, PasswordHasher, RegisterIdentity};
pub use session::{
    AuthRequirement, Credentials, Session, SessionRequest, SessionResolver, SessionState,
};
pub use token::{TokenService, TokenServiceConfig};
