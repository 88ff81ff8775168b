#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_optional, env_parse_or};

/// Redis connection settings
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
    /// Logical database selected with `/{db}` on the URL
    pub database: Option<u8>,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: None,
        }
    }

    pub fn with_database(mut self, database: u8) -> Self {
        self.database = Some(database);
        self
    }

    /// Connection URL including the database suffix, if any
    pub fn connection_url(&self) -> String {
        match self.database {
            Some(db) => format!("{}/{}", self.url.trim_end_matches('/'), db),
            None => self.url.clone(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::new("redis://127.0.0.1:6379")
    }
}

#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    /// `REDIS_URL` (or the older `REDIS_HOST`) plus optional `REDIS_DATABASE`
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_optional("REDIS_URL")
            .or_else(|| env_optional("REDIS_HOST"))
            .ok_or_else(|| ConfigError::MissingEnvVar("REDIS_URL".to_string()))?;

        let database = match env_optional("REDIS_DATABASE") {
            Some(_) => Some(env_parse_or("REDIS_DATABASE", 0u8)?),
            None => None,
        };

        Ok(Self { url, database })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_url_with_database() {
        let config = RedisConfig::new("redis://cache:6379/").with_database(3);
        assert_eq!(config.connection_url(), "redis://cache:6379/3");
        assert_eq!(RedisConfig::default().connection_url(), "redis://127.0.0.1:6379");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_prefers_redis_url() {
        temp_env::with_vars(
            [
                ("REDIS_URL", Some("redis://primary:6379")),
                ("REDIS_HOST", Some("redis://legacy:6379")),
                ("REDIS_DATABASE", None),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.url, "redis://primary:6379");
                assert_eq!(config.database, None);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_falls_back_to_host() {
        temp_env::with_vars(
            [
                ("REDIS_URL", None),
                ("REDIS_HOST", Some("redis://legacy:6379")),
                ("REDIS_DATABASE", Some("2")),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.connection_url(), "redis://legacy:6379/2");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_missing_and_invalid() {
        temp_env::with_vars([("REDIS_URL", None::<&str>), ("REDIS_HOST", None)], || {
            assert!(RedisConfig::from_env().is_err());
        });
        temp_env::with_vars(
            [
                ("REDIS_URL", Some("redis://cache:6379")),
                ("REDIS_DATABASE", Some("not-a-number")),
            ],
            || {
                let err = RedisConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("REDIS_DATABASE"));
            },
        );
    }
}
