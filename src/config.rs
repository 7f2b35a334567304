use crate::errors::{DbError, DbResult, ServiceError, ServiceResult};
use log::info;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::env;
use std::net::SocketAddr;

const DEFAULT_DATABASE_URL: &str = "sqlite://program_reports.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Runtime settings for the report server
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

impl Config {
    /// Read settings from the process environment, after loading `.env` when present
    pub fn from_env() -> ServiceResult<Self> {
        if dotenv::dotenv().is_ok() {
            info!("Loaded environment from .env");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| ServiceError::Configuration("JWT_SECRET must be set".to_string()))?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ServiceError::Configuration(format!("Invalid BIND_ADDR: {}", e)))?;

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ServiceError::Configuration(format!("Invalid DB_MAX_CONNECTIONS: '{}'", raw)))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
        })
    }

    pub async fn connect_pool(&self) -> DbResult<SqlitePool> {
        SqlitePoolOptions::new()
            .max_connections(self.db_max_connections)
            .connect(&self.database_url)
            .await
            .map_err(|e| DbError::ConnectionPool(format!("Failed to open {}: {}", self.database_url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_max_connections, 5);
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ServiceError::Configuration(_))));

        let blank = Config::from_lookup(lookup_from(&[("JWT_SECRET", "  ")]));
        assert!(matches!(blank, Err(ServiceError::Configuration(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_addr = Config::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("BIND_ADDR", "nowhere")]));
        assert!(matches!(bad_addr, Err(ServiceError::Configuration(_))));

        let zero_pool = Config::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("DB_MAX_CONNECTIONS", "0")]));
        assert!(matches!(zero_pool, Err(ServiceError::Configuration(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "hunter2")])).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[tokio::test]
    async fn test_connect_pool_in_memory() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "x"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DB_MAX_CONNECTIONS", "1"),
        ]))
        .unwrap();
        let pool = config.connect_pool().await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
