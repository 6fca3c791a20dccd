//! Token service module for JWT management
//!
//! - `codec` - signing and verification of claim sets
//! - `issuer` - access/refresh minting, with refresh tokens registered as active
//! - `validator` - decoding plus blacklist lookup
//! - `revocation` - single revocation, one-time redemption, revoke-all
//! - `service` - owns the codec and the bounded store handle

mod codec;
mod config;
mod issuer;
pub mod keys;
mod revocation;
mod service;
mod validator;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::{parse_algorithm, TokenServiceConfig};
pub use issuer::TokenIssuer;
pub use revocation::RevocationManager;
pub use service::TokenService;
pub use validator::TokenValidator;
