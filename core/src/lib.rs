//! # Atlas Core
//!
//! Token lifecycle and session authentication for the Atlas auth service.
//! This crate contains the domain entities, error types, repository interfaces
//! and the token, session and auth services built on them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
