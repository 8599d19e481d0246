//! Ledger port - 書き込みのミラー先（chaincode 相当）
//!
//! Every entity write is mirrored here as a key/value world-state update.
//! Keys are prefixed record ids, values are record JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TransactionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The chaincode refused the request (duplicate key, missing key, ...).
    #[error("ledger rejected request: {0}")]
    Rejected(String),

    #[error("entity not found on ledger: {0}")]
    EntityNotFound(String),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// State of one key as seen by a ledger query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Found(String),
    NotFound,
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Create a new key. Fails with `Rejected` when it already exists.
    async fn add(&self, entity: &str, value: &str) -> Result<TransactionId, LedgerError>;

    async fn get(&self, entity: &str) -> Result<EntityState, LedgerError>;

    /// Overwrite an existing key.
    async fn set(&self, entity: &str, value: &str) -> Result<TransactionId, LedgerError>;

    async fn delete(&self, entity: &str) -> Result<TransactionId, LedgerError>;
}
