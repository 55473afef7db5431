//! `SQLite` implementation of [`ConfigEntryRepository`].

use std::future::Future;

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use meteobridge_app::ports::ConfigEntryRepository;
use meteobridge_domain::config_entry::ConfigEntry;
use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::error::{MeteobridgeError, NotFoundError};
use meteobridge_domain::id::EntryId;
use meteobridge_domain::time::Timestamp;

use crate::error::StorageError;

const TABLE: &str = "config_entries";

struct Wrapper(ConfigEntry);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ConfigEntry> {
        value.map(|w| w.0)
    }
}

fn decode_error(reason: impl Into<String>) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(StorageError::Corrupt {
        table: TABLE,
        reason: reason.into(),
    }))
}

fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Fixed-width so that text ordering matches time ordering.
fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let port: i64 = row.try_get("port")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let port =
            u16::try_from(port).map_err(|_| decode_error(format!("port {port} out of range")))?;
        let station_mac: String = row.try_get("station_mac")?;

        Ok(Self(ConfigEntry {
            id: EntryId::from_uuid(id),
            domain: row.try_get("domain")?,
            title: row.try_get("title")?,
            unique_id: station_mac.clone(),
            data: ConnectionConfig {
                host: row.try_get("host")?,
                port,
                username: row.try_get("username")?,
                password: row.try_get("password")?,
                database: row.try_get("database_name")?,
                station_mac,
            },
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO config_entries
        (id, domain, title, station_mac, host, port, username, password, database_name, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM config_entries WHERE id = ?";
const SELECT_BY_UNIQUE_ID: &str =
    "SELECT * FROM config_entries WHERE domain = ? AND station_mac = ?";
const SELECT_ALL: &str = "SELECT * FROM config_entries ORDER BY created_at, id";
const UPDATE: &str = r"
    UPDATE config_entries
    SET title = ?, station_mac = ?, host = ?, port = ?, username = ?, password = ?,
        database_name = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM config_entries WHERE id = ?";

fn not_found(id: EntryId) -> MeteobridgeError {
    NotFoundError {
        entity: "ConfigEntry",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed config entry store.
pub struct SqliteConfigEntryRepository {
    pool: SqlitePool,
}

impl SqliteConfigEntryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ConfigEntryRepository for SqliteConfigEntryRepository {
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, MeteobridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            entry.validate()?;
            sqlx::query(INSERT)
                .bind(entry.id.as_uuid())
                .bind(&entry.domain)
                .bind(&entry.title)
                .bind(&entry.data.station_mac)
                .bind(&entry.data.host)
                .bind(i64::from(entry.data.port))
                .bind(&entry.data.username)
                .bind(&entry.data.password)
                .bind(&entry.data.database)
                .bind(format_timestamp(entry.created_at))
                .bind(format_timestamp(entry.updated_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(entry)
        }
    }

    fn get_by_id(
        &self,
        id: EntryId,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, MeteobridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_uuid())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_unique_id(
        &self,
        domain: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, MeteobridgeError>> + Send {
        let pool = self.pool.clone();
        let domain = domain.to_string();
        let unique_id = unique_id.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_UNIQUE_ID)
                .bind(domain)
                .bind(unique_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, MeteobridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, MeteobridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            entry.validate()?;
            let result = sqlx::query(UPDATE)
                .bind(&entry.title)
                .bind(&entry.data.station_mac)
                .bind(&entry.data.host)
                .bind(i64::from(entry.data.port))
                .bind(&entry.data.username)
                .bind(&entry.data.password)
                .bind(&entry.data.database)
                .bind(format_timestamp(entry.updated_at))
                .bind(entry.id.as_uuid())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(not_found(entry.id));
            }
            Ok(entry)
        }
    }

    fn delete(&self, id: EntryId) -> impl Future<Output = Result<(), MeteobridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.as_uuid())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(not_found(id));
            }
            Ok(())
        }
    }
}
