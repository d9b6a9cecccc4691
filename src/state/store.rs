//! Persistence seams used by the gallery
//!
//! `Library` implements both traits on top of SQLite. Anything else that
//! can hold records keyed by id (tests, a future remote backend) plugs in here.

use async_trait::async_trait;

use super::data::WorkRecord;
use crate::error::StoreError;

/// Durable key-value collection of work records, keyed by `id`
#[async_trait]
pub trait WorkStore: Send + Sync {
    /// Upsert a record, replacing any stored record with the same id in full
    async fn put(&self, record: &WorkRecord) -> Result<(), StoreError>;

    /// Every stored record, in no particular order
    async fn get_all(&self) -> Result<Vec<WorkRecord>, StoreError>;

    /// Remove a record. Removing an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Durable string flags with a lifecycle independent of the records
#[async_trait]
pub trait FlagStore: Send + Sync {
    async fn read_flag(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn write_flag(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn clear_flag(&self, key: &str) -> Result<(), StoreError>;
}

/// Stand-in for a store that failed to open.
///
/// Every call fails with [`StoreError::Unavailable`], so reads degrade the
/// way any unreadable store does and writes are refused.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl WorkStore for UnavailableStore {
    async fn put(&self, _record: &WorkRecord) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn get_all(&self) -> Result<Vec<WorkRecord>, StoreError> {
        Err(self.error())
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(self.error())
    }
}

#[async_trait]
impl FlagStore for UnavailableStore {
    async fn read_flag(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(self.error())
    }

    async fn write_flag(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn clear_flag(&self, _key: &str) -> Result<(), StoreError> {
        Err(self.error())
    }
}
