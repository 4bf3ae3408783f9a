//! MySQL implementation of the SessionStore trait.
//!
//! The consume primitives take a row lock (`SELECT ... FOR UPDATE`) and
//! perform the delete (and replacement insert) inside one transaction, which
//! is what gives `consume` its one-winner guarantee under concurrent
//! rotation attempts: the losing transaction blocks on the row lock and
//! finds no row once the winner commits. Contention is per token row only,
//! so no cross-record lock ordering is involved.
//!
//! Expected schema: see `migrations/0001_create_refresh_tokens.sql`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use tg_core::domain::entities::token::RefreshTokenRecord;
use tg_core::errors::StoreError;
use tg_core::repositories::session_store::{ConsumeOutcome, SessionStore};

const SELECT_FOR_UPDATE: &str = r#"
    SELECT user_id, token_hash, expires_at, created_at
    FROM refresh_tokens
    WHERE token_hash = ?
    FOR UPDATE
"#;

const DELETE_BY_HASH: &str = "DELETE FROM refresh_tokens WHERE token_hash = ?";

const INSERT_RECORD: &str = r#"
    INSERT INTO refresh_tokens (user_id, token_hash, expires_at, created_at)
    VALUES (?, ?, ?, ?)
"#;

/// MySQL-backed session store.
pub struct MySqlSessionStore {
    pool: MySqlPool,
}

impl MySqlSessionStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, StoreError> {
        let user_id: String = row.try_get("user_id").map_err(db_error)?;

        Ok(RefreshTokenRecord {
            user_id: Uuid::parse_str(&user_id).map_err(|e| StoreError::Database {
                message: format!("invalid user UUID in store: {}", e),
            })?,
            token_hash: row.try_get("token_hash").map_err(db_error)?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(db_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_error)?,
        })
    }

    async fn insert_in_tx(
        tx: &mut Transaction<'_, MySql>,
        record: &RefreshTokenRecord,
    ) -> Result<(), StoreError> {
        sqlx::query(INSERT_RECORD)
            .bind(record.user_id.to_string())
            .bind(&record.token_hash)
            .bind(record.expires_at)
            .bind(record.created_at)
            .execute(&mut **tx)
            .await
            .map_err(insert_error)?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<(), StoreError> {
        sqlx::query(INSERT_RECORD)
            .bind(record.user_id.to_string())
            .bind(&record.token_hash)
            .bind(record.expires_at)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(insert_error)?;

        Ok(())
    }

    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let row = sqlx::query(SELECT_FOR_UPDATE)
            .bind(token_hash)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(db_error)?;
            return Ok(None);
        };
        let record = Self::row_to_record(&row)?;

        sqlx::query(DELETE_BY_HASH)
            .bind(token_hash)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        tx.commit().await.map_err(db_error)?;

        Ok(Some(record))
    }

    async fn consume_and_replace(
        &self,
        token_hash: &str,
        replacement: RefreshTokenRecord,
    ) -> Result<ConsumeOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let row = sqlx::query(SELECT_FOR_UPDATE)
            .bind(token_hash)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(db_error)?;
            return Ok(ConsumeOutcome::NotFound);
        };
        let old = Self::row_to_record(&row)?;

        sqlx::query(DELETE_BY_HASH)
            .bind(token_hash)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if old.is_expired() {
            // Stale record: delete on discovery, no replacement.
            tx.commit().await.map_err(db_error)?;
            return Ok(ConsumeOutcome::Stale(old));
        }

        Self::insert_in_tx(&mut tx, &replacement).await?;
        tx.commit().await.map_err(db_error)?;

        Ok(ConsumeOutcome::Replaced(old))
    }

    async fn delete_one(&self, token_hash: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(DELETE_BY_HASH)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let count: i64 = row.try_get("n").map_err(db_error)?;
        Ok(count as usize)
    }

    async fn delete_expired(&self) -> Result<usize, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() as usize)
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    tracing::error!("session store query failed: {}", e);
    StoreError::Database {
        message: e.to_string(),
    }
}

fn insert_error(e: sqlx::Error) -> StoreError {
    if e.as_database_error()
        .is_some_and(|d| d.is_unique_violation())
    {
        return StoreError::DuplicateToken;
    }
    db_error(e)
}
