//! Shared application state handed to the stateful routers.

/// Cloned per handler; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Redis connection manager, also backing the OAuth state and selection cache
    pub redis: database::redis::ConnectionManager,
}
