//! Authentication service module
//!
//! - Registration of admins and project users
//! - Password login and verified-email sign-in
//! - Explicit refresh, logout and logout everywhere

mod password;
mod service;

#[cfg(test)]
mod tests;

pub use password::PasswordHasher;
pub use service::{AuthService, RegisterIdentity};
