//! Redis-backed document store adapters.
//!
//! The preference document lives as one JSON document per user under a
//! namespaced, versioned key; the change ledger is an append-only Redis
//! list. The profile synchronization service is the only caller.

mod redis_pool;
mod redis_preference_documents;
mod redis_profile_history;

pub use redis_pool::{RedisPool, RedisPoolError};
pub use redis_preference_documents::RedisPreferenceDocumentRepository;
pub use redis_profile_history::RedisProfileHistoryRepository;
