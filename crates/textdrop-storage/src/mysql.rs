use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::{MySqlPool, Row};
use textdrop_core::error::StorageError;
use textdrop_core::repository::{Repository, Result, StoreStats, TextRecord};
use textdrop_core::ShareCode;

/// MySQL implementation of the repository contract.
///
/// One row per share code in `shared_texts`, with a unique index on
/// `code` so the create-path exists/insert race collapses into a
/// `Conflict` insert error instead of a duplicate row. `expires_at` is
/// stored as unix seconds. Reads do not filter on expiry; the service
/// layer owns the read-time double-check.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_expires_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid expires_at timestamp '{}': {e}", seconds))
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
impl Repository for MySqlRepository {
    async fn insert(&self, code: &ShareCode, record: TextRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO shared_texts (code, content, expires_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(code.as_str())
        .bind(record.content)
        .bind(record.expires_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn get(&self, code: &ShareCode) -> Result<Option<TextRecord>> {
        let row = sqlx::query(
            r#"
            SELECT content, expires_at
            FROM shared_texts
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let content: String = row.try_get("content").map_err(map_sqlx_error)?;
        let expires_at_raw: i64 = row.try_get("expires_at").map_err(map_sqlx_error)?;
        let expires_at = parse_expires_at(expires_at_raw)?;

        Ok(Some(TextRecord {
            content,
            expires_at,
        }))
    }

    async fn exists(&self, code: &ShareCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM shared_texts
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn update_content(&self, code: &ShareCode, content: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE shared_texts
            SET content = ?
            WHERE code = ?
            "#,
        )
        .bind(content)
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // MySQL reports changed rows, not matched rows: overwriting a row
        // with identical content affects zero rows. Distinguish that from
        // a missing row.
        self.exists(code).await
    }

    async fn delete(&self, code: &ShareCode) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM shared_texts
            WHERE code = ?
            "#,
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM shared_texts
            WHERE expires_at < ?
            "#,
        )
        .bind(now.as_second())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn count(&self, now: Timestamp) -> Result<StoreStats> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM shared_texts
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let expired: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM shared_texts
            WHERE expires_at < ?
            "#,
        )
        .bind(now.as_second())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(StoreStats {
            total: total as u64,
            expired: expired as u64,
        })
    }
}
