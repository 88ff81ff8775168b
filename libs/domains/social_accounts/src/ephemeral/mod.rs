//! Short-lived key/value storage with per-entry expiry.
//!
//! Backs the OAuth state tokens and the pending account selections. `take`
//! must be atomic so a key can be consumed at most once.

mod memory;
mod redis;

pub use memory::InMemoryEphemeralStore;
pub use redis::RedisEphemeralStore;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::SocialAccountResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value, for `ttl`
    async fn put(&self, key: &str, value: String, ttl: Duration) -> SocialAccountResult<()>;

    /// Read without consuming
    async fn get(&self, key: &str) -> SocialAccountResult<Option<String>>;

    /// Read and delete in one step
    async fn take(&self, key: &str) -> SocialAccountResult<Option<String>>;

    async fn delete(&self, key: &str) -> SocialAccountResult<()>;
}
