//! ChaincodeService - ledger への直接操作
//!
//! Thin request layer over the `Ledger` port: argument checks, error
//! classification and the JSON response shapes. Entity resources use it to
//! mirror their writes; under the dev profile the app exposes it directly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ports::{EntityState, Ledger, LedgerError};

/// Ledger value reported for unknown keys.
pub const NOT_FOUND: &str = "NOT_FOUND";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChaincodeError {
    #[error("EMPTY_ENTITY_NAME")]
    EmptyEntityName,

    #[error("EMPTY_VALUE")]
    EmptyValue,

    /// The chaincode refused the request.
    #[error("BLOCKCHAIN ERROR: {0}")]
    Blockchain(LedgerError),

    #[error("BLOCKCHAIN ERROR: {0}")]
    Internal(LedgerError),
}

impl ChaincodeError {
    /// HTTP-style status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ChaincodeError::EmptyEntityName | ChaincodeError::EmptyValue => 417,
            ChaincodeError::Blockchain(_) => 406,
            ChaincodeError::Internal(_) => 500,
        }
    }
}

impl From<LedgerError> for ChaincodeError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(_) | LedgerError::EntityNotFound(_) => {
                ChaincodeError::Blockchain(err)
            }
            LedgerError::Unavailable(_) => ChaincodeError::Internal(err),
        }
    }
}

/// `{"transactionID": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
}

/// `{"entityState": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStateView {
    #[serde(rename = "entityState")]
    pub entity_state: String,
}

impl EntityStateView {
    pub fn not_found() -> Self {
        Self {
            entity_state: NOT_FOUND.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.entity_state == NOT_FOUND
    }
}

#[derive(Clone)]
pub struct ChaincodeService {
    ledger: Arc<dyn Ledger>,
}

fn require(entity: &str, value: Option<&str>) -> Result<(), ChaincodeError> {
    if entity.is_empty() {
        debug!("Empty entity name");
        return Err(ChaincodeError::EmptyEntityName);
    }
    if let Some(value) = value
        && value.is_empty()
    {
        debug!("Empty value");
        return Err(ChaincodeError::EmptyValue);
    }
    Ok(())
}

fn logged(err: LedgerError) -> ChaincodeError {
    let err = ChaincodeError::from(err);
    debug!(status = err.status_code(), "{err}");
    err
}

impl ChaincodeService {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    pub async fn add(&self, entity: &str, value: &str) -> Result<TransactionReceipt, ChaincodeError> {
        require(entity, Some(value))?;
        let tx = self.ledger.add(entity, value).await.map_err(logged)?;
        Ok(TransactionReceipt {
            transaction_id: tx.to_string(),
        })
    }

    /// Query one key. Unknown keys are a `NOT_FOUND` state, not an error;
    /// every other ledger failure is internal (500), rejections included.
    pub async fn get(&self, entity: &str) -> Result<EntityStateView, ChaincodeError> {
        require(entity, None)?;
        match self.ledger.get(entity).await {
            Ok(EntityState::Found(value)) => Ok(EntityStateView {
                entity_state: value,
            }),
            Ok(EntityState::NotFound) => Ok(EntityStateView::not_found()),
            Err(LedgerError::EntityNotFound(_)) => Ok(EntityStateView::not_found()),
            Err(err) => {
                let err = ChaincodeError::Internal(err);
                debug!(status = err.status_code(), "{err}");
                Err(err)
            }
        }
    }

    pub async fn set(&self, entity: &str, value: &str) -> Result<TransactionReceipt, ChaincodeError> {
        require(entity, Some(value))?;
        let tx = self.ledger.set(entity, value).await.map_err(logged)?;
        Ok(TransactionReceipt {
            transaction_id: tx.to_string(),
        })
    }

    pub async fn delete(&self, entity: &str) -> Result<TransactionReceipt, ChaincodeError> {
        require(entity, None)?;
        let tx = self.ledger.delete(entity).await.map_err(logged)?;
        Ok(TransactionReceipt {
            transaction_id: tx.to_string(),
        })
    }
}
