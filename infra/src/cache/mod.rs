//! Revocation store implementations
//!
//! - `redis_client` - Redis connection with retry logic
//! - `revocation_store` - Redis-backed store used in deployments
//! - `memory_store` - single-process store for development and tests

pub mod memory_store;
pub mod redis_client;
pub mod revocation_store;

#[cfg(test)]
mod tests;

pub use memory_store::MemoryRevocationStore;
pub use redis_client::RedisClient;
pub use revocation_store::RedisRevocationStore;
