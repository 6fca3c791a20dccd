pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod bounded;

pub use bounded::BoundedStore;
pub use r#trait::{matches_pattern, RevocationStore};

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockRevocationStore;
