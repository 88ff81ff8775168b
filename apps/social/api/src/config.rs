use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_optional, env_or_default, env_required,
    server::ServerConfig,
};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;
use domain_social_accounts::{Platform, PlatformConfig};
use std::fmt;

pub use core_config::Environment;

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub oauth: OAuthConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let redis = RedisConfig::from_env()?;
        let oauth = OAuthConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            redis,
            server,
            environment,
            oauth,
        })
    }
}

/// OAuth client credentials and the URLs the connect flow redirects through
#[derive(Clone)]
pub struct OAuthConfig {
    /// Only platforms with both a client id and secret set
    pub platforms: Vec<(Platform, PlatformConfig)>,
    /// Public base URL of this API, used to build callback URLs
    pub redirect_base_url: String,
    pub frontend_url: String,
    /// 64 hex characters
    pub encryption_key: String,
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let configured: Vec<Platform> = self.platforms.iter().map(|(p, _)| *p).collect();
        f.debug_struct("OAuthConfig")
            .field("platforms", &configured)
            .field("redirect_base_url", &self.redirect_base_url)
            .field("frontend_url", &self.frontend_url)
            .field("encryption_key", &"[redacted]")
            .finish()
    }
}

/// `facebook` -> `FACEBOOK`
fn env_prefix(platform: Platform) -> String {
    platform.to_string().to_uppercase()
}

impl FromEnv for OAuthConfig {
    /// `{PLATFORM}_CLIENT_ID` and `{PLATFORM}_CLIENT_SECRET` per platform,
    /// `OAUTH_REDIRECT_BASE_URL`, `FRONTEND_URL` and the required
    /// `CREDENTIALS_ENCRYPTION_KEY`.
    fn from_env() -> Result<Self, ConfigError> {
        let mut platforms = Vec::new();
        for platform in Platform::ALL {
            let prefix = env_prefix(platform);
            let id_key = format!("{}_CLIENT_ID", prefix);
            let secret_key = format!("{}_CLIENT_SECRET", prefix);

            match (env_optional(&id_key), env_optional(&secret_key)) {
                (Some(id), Some(secret)) => {
                    platforms.push((platform, PlatformConfig::new(platform, id, secret)));
                }
                (None, None) => {}
                (Some(_), None) => return Err(ConfigError::MissingEnvVar(secret_key)),
                (None, Some(_)) => return Err(ConfigError::MissingEnvVar(id_key)),
            }
        }

        let encryption_key = env_required("CREDENTIALS_ENCRYPTION_KEY")?;
        if encryption_key.len() != 64 || !encryption_key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidValue {
                key: "CREDENTIALS_ENCRYPTION_KEY".to_string(),
                details: "expected 64 hex characters".to_string(),
            });
        }

        Ok(Self {
            platforms,
            redirect_base_url: env_or_default("OAUTH_REDIRECT_BASE_URL", "http://localhost:8080"),
            frontend_url: env_or_default("FRONTEND_URL", "http://localhost:3000"),
            encryption_key,
        })
    }
}
