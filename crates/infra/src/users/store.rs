use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use kots_core::UserId;

use super::{UserRecord, UserUpdate};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Conditional create found an existing item.
    #[error("user {0} already exists")]
    AlreadyExists(UserId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value user table.
///
/// Mirrors the operations of a managed document table: a conditional create
/// (`attribute_not_exists(id)`), an update that creates the item when
/// absent, and delete returning the old item.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Write only if no item with the same id exists.
    async fn create(&self, record: UserRecord) -> Result<(), StoreError>;

    /// Set the profile attributes and return the full new item.
    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<UserRecord, StoreError>;

    /// Remove an item, returning what was stored.
    async fn delete(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError>;
}

/// In-memory user table for tests/dev.
#[derive(Debug)]
pub struct InMemoryUserStore {
    table: String,
    inner: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn poisoned(&self) -> StoreError {
        StoreError::Unavailable(format!("table '{}' lock poisoned", self.table))
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new("users")
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        let map = self.inner.read().map_err(|_| self.poisoned())?;
        Ok(map.get(id).cloned())
    }

    async fn create(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| self.poisoned())?;
        if map.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        map.insert(record.id, record);
        Ok(())
    }

    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<UserRecord, StoreError> {
        let mut map = self.inner.write().map_err(|_| self.poisoned())?;
        let record = map.entry(*id).or_insert_with(|| UserRecord::bare(*id));
        record.apply(update);
        Ok(record.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        let mut map = self.inner.write().map_err(|_| self.poisoned())?;
        Ok(map.remove(id))
    }
}
