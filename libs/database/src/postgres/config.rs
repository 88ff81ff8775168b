use sea_orm::ConnectOptions;
use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

/// Pool settings for the PostgreSQL connection
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Log every statement through sqlx
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 300,
            sqlx_logging: false,
        }
    }

    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections.min(max_connections);
        self
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .sqlx_logging(self.sqlx_logging);
        opt
    }
}

#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    /// `DATABASE_URL` is required. Pool sizing comes from `DB_MAX_CONNECTIONS`
    /// and `DB_MIN_CONNECTIONS`; `DB_LOG_STATEMENTS=true` turns on sqlx logging.
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required("DATABASE_URL")?;
        let defaults = Self::new(url);

        let max = env_parse_or("DB_MAX_CONNECTIONS", defaults.max_connections)?;
        let min = env_parse_or("DB_MIN_CONNECTIONS", defaults.min_connections)?;
        if max == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        let sqlx_logging = env_parse_or("DB_LOG_STATEMENTS", false)?;

        Ok(Self {
            sqlx_logging,
            ..defaults.with_pool_size(max, min)
        })
    }
}
