//! Session resolution for incoming requests
//!
//! Turns the credentials on a request into an identity of the requested class,
//! rotating the refresh token when the access token can no longer be used.

mod resolver;


pub use resolver::{
    AuthRequirement, Credentials, Session, SessionRequest, SessionResolver, SessionState,
};
