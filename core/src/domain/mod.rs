//! Domain layer containing business entities.

pub mod entities;

pub use entities::{
    Claims, Identity, IdentityClass, IdentityFilter, NewIdentity, TokenKind, TokenPair,
    BEARER_TOKEN_TYPE,
};
