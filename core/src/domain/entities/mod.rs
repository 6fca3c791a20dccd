//! Domain entities representing core business objects.

pub mod identity;
pub mod token;

pub use identity::{Identity, IdentityClass, IdentityFilter, NewIdentity};
pub use token::{Claims, TokenKind, TokenPair, BEARER_TOKEN_TYPE};
