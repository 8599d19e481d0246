//! EntityStore port - レコードの正本（source of truth）
//!
//! The store owns id assignment: `insert` takes bare fields and returns the
//! committed record. Records come back in creation order.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Entity, Id, Record};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("store rejected the operation: {0}")]
    Rejected(String),
}

/// EntityStore は 1 種類の entity の CRUD を提供
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Persist new fields and assign an id.
    async fn insert(&self, fields: E) -> Result<Record<E>, StoreError>;

    /// Replace the fields of an existing record.
    async fn update(&self, record: Record<E>) -> Result<Record<E>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Record<E>>, StoreError>;

    async fn find_by_id(&self, id: Id<E::Marker>) -> Result<Option<Record<E>>, StoreError>;

    /// Remove a record. Returns `false` when the id was unknown.
    async fn delete_by_id(&self, id: Id<E::Marker>) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.find_all().await?.len())
    }
}
