//! Database primitives shared by the HR crates: settings, pooled connections
//! and throwaway in-memory stores.

use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

/// URL of the isolated store handed out by [`connect_ephemeral`].
pub const EPHEMERAL_URL: &str = "sqlite::memory:";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (expected env `{0}`)")]
    MissingUrl(String),
    #[error("invalid setting {key}: {value:?}")]
    InvalidSetting { key: &'static str, value: String },
    #[error(transparent)]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url_key")]
    env_key: String,
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::new(default_url_key())
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            max_connections: None,
            sqlx_logging: false,
        }
    }

    /// Reads `DATABASE_MAX_CONNECTIONS` and `DATABASE_SQL_LOG` on top of the defaults.
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let mut settings = Self::default();
        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            let parsed = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(DbError::InvalidSetting {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: raw.clone(),
                })?;
            settings.max_connections = Some(parsed);
        }
        if let Some(raw) = lookup("DATABASE_SQL_LOG") {
            settings.sqlx_logging = matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(settings)
    }

    pub fn env_key(&self) -> &str {
        &self.env_key
    }

    pub fn database_url(&self) -> DbResult<String> {
        std::env::var(&self.env_key).map_err(|_| DbError::MissingUrl(self.env_key.clone()))
    }

    fn connect_options(&self, url: impl Into<String>) -> ConnectOptions {
        let mut options = ConnectOptions::new(url.into());
        options
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(self.sqlx_logging);
        if let Some(max) = self.max_connections {
            options.max_connections(max);
        }
        options
    }
}

/// Opens a pool against the URL named by `settings`.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let url = settings.database_url()?;
    connect_url(&url, settings).await
}

pub async fn connect_url(url: &str, settings: &DatabaseSettings) -> DbResult<DbPool> {
    let pool = Database::connect(settings.connect_options(url)).await?;
    debug!(backend = ?pool.get_database_backend(), "database pool ready");
    Ok(pool)
}

/// Fresh in-memory SQLite store with every migration applied.
///
/// Each call yields an independent database. The pool is pinned to one
/// connection because every SQLite memory connection owns its own database.
pub async fn connect_ephemeral() -> DbResult<DbPool> {
    let mut options = ConnectOptions::new(EPHEMERAL_URL.to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(Duration::from_secs(3600))
        .sqlx_logging(false);
    let pool = Database::connect(options).await?;
    Migrator::up(&pool, None).await?;
    info!("ephemeral store ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_database_url() {
        let settings = DatabaseSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.env_key(), "DATABASE_URL");
        assert_eq!(settings.max_connections, None);
        assert!(!settings.sqlx_logging);
    }

    #[test]
    fn reads_pool_size_and_sql_logging() {
        let settings = DatabaseSettings::from_lookup(lookup(&[
            ("DATABASE_MAX_CONNECTIONS", " 4 "),
            ("DATABASE_SQL_LOG", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(settings.max_connections, Some(4));
        assert!(settings.sqlx_logging);
    }

    #[test]
    fn rejects_bad_pool_size() {
        for raw in ["zero", "0", "-3"] {
            let err = DatabaseSettings::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", raw)]))
                .unwrap_err();
            assert!(matches!(
                err,
                DbError::InvalidSetting {
                    key: "DATABASE_MAX_CONNECTIONS",
                    ..
                }
            ));
        }
    }

    #[test]
    fn missing_url_names_the_env_key() {
        let settings = DatabaseSettings::new("HR_TEST_URL_THAT_IS_NEVER_SET");
        let err = settings.database_url().unwrap_err();
        assert_eq!(
            err.to_string(),
            "database url missing (expected env `HR_TEST_URL_THAT_IS_NEVER_SET`)"
        );
    }

    #[tokio::test]
    async fn ephemeral_stores_are_isolated() {
        use sea_orm::{DatabaseBackend, Statement};

        let first = connect_ephemeral().await.unwrap();
        let second = connect_ephemeral().await.unwrap();
        first
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "INSERT INTO employees (first_name, last_name, email) VALUES ('a', 'b', 'c@d')",
            ))
            .await
            .unwrap();

        let count = |db: DbPool| async move {
            let row = db
                .query_one(Statement::from_string(
                    DatabaseBackend::Sqlite,
                    "SELECT count(*) AS count FROM employees",
                ))
                .await
                .unwrap()
                .unwrap();
            row.try_get::<i64>("", "count").unwrap()
        };
        assert_eq!(count(first).await, 1);
        assert_eq!(count(second).await, 0);
    }
}
