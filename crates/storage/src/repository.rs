use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A single scalar write, applied as part of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    Integer { key: String, value: i64 },
    Timestamp { key: String, value: DateTime<Utc> },
}

impl KvWrite {
    #[must_use]
    pub fn integer(key: impl Into<String>, value: i64) -> Self {
        Self::Integer {
            key: key.into(),
            value,
        }
    }

    #[must_use]
    pub fn timestamp(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::Timestamp {
            key: key.into(),
            value,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Integer { key, .. } | Self::Timestamp { key, .. } => key,
        }
    }
}

/// Durable store of typed scalars keyed by string.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read an integer, `0` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be read or holds another type.
    async fn get_integer(&self, key: &str) -> Result<i64, StorageError>;

    /// Write an integer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_integer(&self, key: &str, value: i64) -> Result<(), StorageError>;

    /// Read a timestamp, `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be read or holds another type.
    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError>;

    /// Write a timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> Result<(), StorageError>;

    /// Apply every write or none of them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch cannot be committed; no write is
    /// visible in that case.
    async fn write_batch(&self, writes: &[KvWrite]) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoredValue {
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, StoredValue>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn type_mismatch(key: &str, expected: &str) -> StorageError {
        StorageError::Serialization(format!("{key} does not hold {expected}"))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_integer(&self, key: &str) -> Result<i64, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get(key) {
            None => Ok(0),
            Some(StoredValue::Integer(value)) => Ok(*value),
            Some(StoredValue::Timestamp(_)) => Err(Self::type_mismatch(key, "an integer")),
        }
    }

    async fn set_integer(&self, key: &str, value: i64) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), StoredValue::Integer(value));
        Ok(())
    }

    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get(key) {
            None => Ok(None),
            Some(StoredValue::Timestamp(value)) => Ok(Some(*value)),
            Some(StoredValue::Integer(_)) => Err(Self::type_mismatch(key, "a timestamp")),
        }
    }

    async fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), StoredValue::Timestamp(value));
        Ok(())
    }

    async fn write_batch(&self, writes: &[KvWrite]) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for write in writes {
            let value = match write {
                KvWrite::Integer { value, .. } => StoredValue::Integer(*value),
                KvWrite::Timestamp { value, .. } => StoredValue::Timestamp(*value),
            };
            guard.insert(write.key().to_owned(), value);
        }
        Ok(())
    }
}

/// Groups the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub statistics: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let statistics: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { statistics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn missing_keys_read_as_defaults() {
        let store = InMemoryStore::new();
        assert_eq!(store.get_integer("gamesCount").await.unwrap(), 0);
        assert_eq!(store.get_timestamp("bestGameDate").await.unwrap(), None);
    }

    #[tokio::test]
    async fn batch_writes_are_visible_together() {
        let store = InMemoryStore::new();
        store
            .write_batch(&[
                KvWrite::integer("gamesCount", 3),
                KvWrite::integer("totalCorrectAnswers", 21),
                KvWrite::timestamp("bestGameDate", at(9)),
            ])
            .await
            .unwrap();

        assert_eq!(store.get_integer("gamesCount").await.unwrap(), 3);
        assert_eq!(store.get_integer("totalCorrectAnswers").await.unwrap(), 21);
        assert_eq!(store.get_timestamp("bestGameDate").await.unwrap(), Some(at(9)));
    }

    #[tokio::test]
    async fn reading_with_the_wrong_type_fails() {
        let store = InMemoryStore::new();
        store.set_timestamp("bestGameDate", at(10)).await.unwrap();
        store.set_integer("gamesCount", 1).await.unwrap();

        assert!(matches!(
            store.get_integer("bestGameDate").await,
            Err(StorageError::Serialization(_))
        ));
        assert!(matches!(
            store.get_timestamp("gamesCount").await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn clones_share_the_same_values() {
        let store = InMemoryStore::new();
        let other = store.clone();
        store.set_integer("gamesCount", 7).await.unwrap();
        assert_eq!(other.get_integer("gamesCount").await.unwrap(), 7);
    }
}
