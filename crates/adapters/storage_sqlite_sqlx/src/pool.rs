//! Config entry store: `SQLite` pool and embedded migrations.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::error::StorageError;

/// Entry writes are rare; a handful of connections is plenty.
const MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the config entries live.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:meteobridge.db?mode=rwc` or
    /// `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Open the store, creating the file when missing, and bring its schema
    /// up to date.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] for a malformed URL, a failed connection or a
    /// failed migration.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!(url = %self.database_url, "config entry store ready");
        Ok(Database { pool })
    }
}

/// An opened config entry store.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Pool to hand to [`SqliteConfigEntryRepository`](crate::SqliteConfigEntryRepository).
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for in-flight queries and close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn should_only_create_config_entries_table() {
        let db = memory_db().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, vec!["config_entries"]);
    }

    #[tokio::test]
    async fn should_enforce_one_entry_per_station_and_domain() {
        let db = memory_db().await;
        let insert = "INSERT INTO config_entries (id, domain, title, station_mac, host, port, username, password, database_name, created_at, updated_at) VALUES (?, 'meteobridge', 't', 'AA:BB:CC', 'h', 3306, 'u', 'p', 'd', '', '')";

        sqlx::query(insert).bind("a").execute(db.pool()).await.unwrap();
        let duplicate = sqlx::query(insert).bind("b").execute(db.pool()).await;

        assert!(duplicate.is_err());
    }
}
