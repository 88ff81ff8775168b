use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use super::RedisConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Open a `ConnectionManager` and verify it with `PING`
pub async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    let client = Client::open(url)?;
    let manager = ConnectionManager::new(client).await?;

    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    info!("Connected to Redis");
    Ok(manager)
}

pub async fn connect_from_config(config: RedisConfig) -> redis::RedisResult<ConnectionManager> {
    connect(&config.connection_url()).await
}

/// Connect, retrying with backoff. `None` uses [`RetryConfig::default`].
pub async fn connect_from_config_with_retry(
    config: RedisConfig,
    retry_config: Option<RetryConfig>,
) -> redis::RedisResult<ConnectionManager> {
    let url = config.connection_url();
    retry_with_backoff(|| connect(&url), retry_config.unwrap_or_default()).await
}

/// `PING` round trip used by the readiness probe
pub async fn check_health(manager: &ConnectionManager) -> DatabaseResult<()> {
    let mut conn = manager.clone();
    let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
    if reply != "PONG" {
        return Err(DatabaseError::HealthCheckFailed(format!(
            "unexpected PING reply: {}",
            reply
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        assert!(connect("not a redis url").await.is_err());
    }

    #[tokio::test]
    #[ignore] // needs a running Redis
    async fn test_connect_live() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let manager = connect(&url).await.unwrap();
        assert!(check_health(&manager).await.is_ok());
    }
}
