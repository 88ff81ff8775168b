//! Shared test infrastructure for the social account crates.
//!
//! - `TestDatabase`: migrated PostgreSQL container (feature: "postgres")
//! - `TestRedis`: Redis container with a `ConnectionManager` (feature: "redis")
//! - `TestDataBuilder`: deterministic ids and names derived from a test name
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!     db.create_brand(builder.workspace_id(), builder.brand_id(), "Acme").await;
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// Deterministic test data seeded from a test name
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    fn uuid_with_tag(&self, tag: u8) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        uuid_bytes[15] ^= tag;
        Uuid::from_bytes(uuid_bytes)
    }

    pub fn user_id(&self) -> Uuid {
        self.uuid_with_tag(0)
    }

    pub fn workspace_id(&self) -> Uuid {
        self.uuid_with_tag(1)
    }

    pub fn brand_id(&self) -> Uuid {
        self.uuid_with_tag(2)
    }

    /// `test-{prefix}-{seed}-{suffix}`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Platform-side identifier, unique per test
    pub fn external_id(&self, suffix: &str) -> String {
        format!("ext-{}-{}", self.seed, suffix)
    }
}
