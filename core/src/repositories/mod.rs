pub mod identity;
pub mod revocation;

pub use identity::IdentityRepository;
pub use revocation::{BoundedStore, RevocationStore};

#[cfg(test)]
pub use identity::MockIdentityRepository;
#[cfg(test)]
pub use revocation::MockRevocationStore;
