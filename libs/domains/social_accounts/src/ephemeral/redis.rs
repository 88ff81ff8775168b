use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

use super::EphemeralStore;
use crate::error::{SocialAccountError, SocialAccountResult};

/// Redis-backed store: `SET EX`, `GET`, `GETDEL`, `DEL`
#[derive(Clone)]
pub struct RedisEphemeralStore {
    redis: ConnectionManager,
}

impl RedisEphemeralStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

fn redis_error(e: redis::RedisError) -> SocialAccountError {
    SocialAccountError::Internal(format!("Redis error: {}", e))
}

#[async_trait]
impl EphemeralStore for RedisEphemeralStore {
    async fn put(&self, key: &str, value: String, ttl: Duration) -> SocialAccountResult<()> {
        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(redis_error)
    }

    async fn get(&self, key: &str) -> SocialAccountResult<Option<String>> {
        let mut conn = self.redis.clone();
        conn.get(key).await.map_err(redis_error)
    }

    async fn take(&self, key: &str) -> SocialAccountResult<Option<String>> {
        let mut conn = self.redis.clone();
        redis::cmd("GETDEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(redis_error)
    }

    async fn delete(&self, key: &str) -> SocialAccountResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(key).await.map_err(redis_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::TestRedis;

    #[tokio::test]
    #[ignore] // needs docker
    async fn test_take_consumes_once() {
        let redis = TestRedis::new().await;
        let store = RedisEphemeralStore::new(redis.connection());

        store
            .put("oauth:state:abc", "payload".into(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.get("oauth:state:abc").await.unwrap().as_deref(), Some("payload"));
        assert_eq!(store.take("oauth:state:abc").await.unwrap().as_deref(), Some("payload"));
        assert_eq!(store.take("oauth:state:abc").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore] // needs docker
    async fn test_entries_expire() {
        let redis = TestRedis::new().await;
        let store = RedisEphemeralStore::new(redis.connection());

        store
            .put("oauth:selection:s1", "payload".into(), Duration::from_secs(1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(store.get("oauth:selection:s1").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore] // needs docker
    async fn test_delete() {
        let redis = TestRedis::new().await;
        let store = RedisEphemeralStore::new(redis.connection());

        store
            .put("oauth:selection:s2", "payload".into(), Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("oauth:selection:s2").await.unwrap();
        assert_eq!(store.get("oauth:selection:s2").await.unwrap(), None);
    }
}
