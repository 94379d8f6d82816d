use async_trait::async_trait;
use jiff::Timestamp;
use shortly_core::error::{Result, StorageError};
use shortly_core::{Identifier, RecentUrls, StorageBackend, UrlRecord};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::{debug, warn};

/// Schema of the `urls` table.
pub const SCHEMA: &str = include_str!("../ddl/postgres/urls.sql");

/// Postgres implementation of the storage contract.
///
/// Records live in a single `urls` table keyed by identifier. The primary
/// key rejects duplicate identifiers with [`StorageError::Conflict`], and
/// `created_at` is filled in by the database.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Creates a backend from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a backend by opening a new connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `urls` table if it does not exist yet.
    pub async fn create_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_created_at(micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", micros))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl StorageBackend for PostgresBackend {
    async fn put(&self, id: &Identifier, url: &str) -> Result<()> {
        let result = sqlx::query("INSERT INTO urls (id, url) VALUES ($1, $2)")
            .bind(id.as_str())
            .bind(url)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                debug!(id = %id, "stored url in postgres");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => {
                warn!(id = %id, "identifier collision in postgres");
                Err(StorageError::Conflict(id.to_string()))
            }
            Err(err) => {
                warn!(id = %id, error = %err, "postgres insert failed");
                Err(map_sqlx_error(err))
            }
        }
    }

    async fn get(&self, id: &Identifier) -> Result<Option<String>> {
        let row = sqlx::query("SELECT url FROM urls WHERE id = $1 LIMIT 1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                warn!(id = %id, error = %err, "postgres lookup failed");
                map_sqlx_error(err)
            })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let url: String = row.try_get("url").map_err(map_sqlx_error)?;
        Ok(Some(url))
    }

    fn as_recent(&self) -> Option<&dyn RecentUrls> {
        Some(self)
    }
}

#[async_trait]
impl RecentUrls for PostgresBackend {
    async fn list_recent(&self, limit: usize) -> Result<Vec<UrlRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            r#"
            SELECT id, url, (EXTRACT(EPOCH FROM created_at) * 1000000)::BIGINT AS created_at_us
            FROM urls
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(map_sqlx_error)?;
                let url: String = row.try_get("url").map_err(map_sqlx_error)?;
                let created_at_us: i64 = row.try_get("created_at_us").map_err(map_sqlx_error)?;
                let id = Identifier::new(id)
                    .map_err(|e| StorageError::InvalidData(e.to_string()))?;

                Ok(UrlRecord {
                    id,
                    url,
                    created_at: parse_created_at(created_at_us)?,
                })
            })
            .collect()
    }
}
