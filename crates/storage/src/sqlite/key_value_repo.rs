use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::repository::{KeyValueStore, KvWrite, StorageError};

use super::SqliteRepository;

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn type_mismatch(key: &str, expected: &str) -> StorageError {
    StorageError::Serialization(format!("{key} does not hold {expected}"))
}

async fn upsert(conn: &mut SqliteConnection, write: &KvWrite) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    match write {
        KvWrite::Integer { key, value } => {
            sqlx::query(
                r"
                INSERT INTO key_values (key, int_value, timestamp_value, updated_at)
                VALUES (?1, ?2, NULL, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    int_value = excluded.int_value,
                    timestamp_value = NULL,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(key.as_str())
            .bind(*value)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        }
        KvWrite::Timestamp { key, value } => {
            sqlx::query(
                r"
                INSERT INTO key_values (key, int_value, timestamp_value, updated_at)
                VALUES (?1, NULL, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    int_value = NULL,
                    timestamp_value = excluded.timestamp_value,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(key.as_str())
            .bind(*value)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

impl SqliteRepository {
    async fn fetch_row(&self, key: &str) -> Result<Option<SqliteRow>, StorageError> {
        sqlx::query("SELECT int_value, timestamp_value FROM key_values WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)
    }

    async fn apply(&self, writes: &[KvWrite]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for write in writes {
            upsert(&mut *tx, write).await.map_err(conn)?;
        }
        tx.commit().await.map_err(conn)
    }
}

#[async_trait]
impl KeyValueStore for SqliteRepository {
    async fn get_integer(&self, key: &str) -> Result<i64, StorageError> {
        let Some(row) = self.fetch_row(key).await? else {
            return Ok(0);
        };
        let value: Option<i64> = row.try_get("int_value").map_err(ser)?;
        value.ok_or_else(|| type_mismatch(key, "an integer"))
    }

    async fn set_integer(&self, key: &str, value: i64) -> Result<(), StorageError> {
        self.apply(&[KvWrite::integer(key, value)]).await
    }

    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        let Some(row) = self.fetch_row(key).await? else {
            return Ok(None);
        };
        let value: Option<DateTime<Utc>> = row.try_get("timestamp_value").map_err(ser)?;
        value.map(Some).ok_or_else(|| type_mismatch(key, "a timestamp"))
    }

    async fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> Result<(), StorageError> {
        self.apply(&[KvWrite::timestamp(key, value)]).await
    }

    async fn write_batch(&self, writes: &[KvWrite]) -> Result<(), StorageError> {
        self.apply(writes).await?;
        tracing::debug!(count = writes.len(), "committed key-value batch");
        Ok(())
    }
}
