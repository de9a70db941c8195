use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tinylink_core::error::{Result, StorageError};
use tinylink_core::repository::{LinkRecord, NewLink, ReadRepository, Repository};
use tinylink_core::shortcode::ShortCode;
use tracing::debug;

/// DDL for the `links` table. Every statement is idempotent.
pub const SCHEMA: &str = include_str!("../ddl/postgres/links.sql");

const LINK_COLUMNS: &str = "id, code, target_url, total_clicks, last_clicked, created_at";

/// Postgres implementation of the repository contract.
///
/// Uniqueness of `code` is enforced by the `links_code_key` constraint and a
/// violation on insert surfaces as [`StorageError::Conflict`]. Timestamps are
/// stored as microseconds since the Unix epoch.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Creates a repository from an existing Postgres connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new Postgres connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies [`SCHEMA`] to the connected database.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("links schema is up to date");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_micros(ts: Timestamp) -> i64 {
    ts.as_microsecond()
}

fn from_micros(column: &str, value: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(value).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{value}': {e}"))
    })
}

fn row_to_record(row: &PgRow) -> Result<LinkRecord> {
    let code: String = row.try_get("code").map_err(map_sqlx_error)?;
    let total_clicks: i64 = row.try_get("total_clicks").map_err(map_sqlx_error)?;
    let last_clicked: Option<i64> = row.try_get("last_clicked").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        code: ShortCode::new_unchecked(code),
        target_url: row.try_get("target_url").map_err(map_sqlx_error)?,
        total_clicks: u64::try_from(total_clicks).map_err(|_| {
            StorageError::InvalidData(format!("negative total_clicks: {total_clicks}"))
        })?,
        last_clicked: last_clicked
            .map(|value| from_micros("last_clicked", value))
            .transpose()?,
        created_at: from_micros("created_at", created_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
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
impl ReadRepository for PgRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1 LIMIT 1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query("SELECT 1 FROM links WHERE code = $1 LIMIT 1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .is_some();

        Ok(exists)
    }

    async fn list(&self) -> Result<Vec<LinkRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_record).collect()
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert(&self, link: NewLink) -> Result<LinkRecord> {
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO links (code, target_url, total_clicks, last_clicked, created_at)
            VALUES ($1, $2, 0, NULL, $3)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(link.code.as_str())
        .bind(&link.target_url)
        .bind(to_micros(link.created_at))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => row_to_record(&row),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(link.code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(&format!(
            "DELETE FROM links WHERE code = $1 RETURNING {LINK_COLUMNS}"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn record_click(&self, code: &ShortCode, at: Timestamp) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            UPDATE links
            SET total_clicks = total_clicks + 1,
                last_clicked = $2
            WHERE code = $1
            RETURNING target_url
            "#,
        )
        .bind(code.as_str())
        .bind(to_micros(at))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| row.try_get::<String, _>("target_url").map_err(map_sqlx_error))
            .transpose()
    }
}
