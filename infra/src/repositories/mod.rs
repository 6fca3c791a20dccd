//! Identity repository implementations

pub mod memory_identity;

pub use memory_identity::MemoryIdentityRepository;
