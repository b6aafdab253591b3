//! Identity provider group administration.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use kots_auth::{GroupName, Groups};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Admin-side view of user pool group membership.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn add_user_to_group(
        &self,
        user_pool_id: &str,
        username: &str,
        group: GroupName,
    ) -> Result<(), DirectoryError>;
}

/// In-memory directory for tests/dev. Membership is keyed by `(pool, username)`.
#[derive(Debug, Default)]
pub struct InMemoryGroupDirectory {
    inner: RwLock<HashMap<(String, String), Groups>>,
}

impl InMemoryGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupDirectory for InMemoryGroupDirectory {
    async fn add_user_to_group(
        &self,
        user_pool_id: &str,
        username: &str,
        group: GroupName,
    ) -> Result<(), DirectoryError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;
        map.entry((user_pool_id.to_string(), username.to_string()))
            .or_default()
            .insert(group);
        Ok(())
    }
}
