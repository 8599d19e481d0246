//! InMemoryLedger - 開発用の ledger
//!
//! World state (key -> value) plus an append-only transaction log, one
//! entry per accepted write. Rejections do not produce a transaction.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::TransactionId;
use crate::ports::{Clock, EntityState, IdGenerator, Ledger, LedgerError, next_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOp {
    Add,
    Set,
    Delete,
}

/// One accepted ledger write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub id: TransactionId,
    pub op: LedgerOp,
    pub entity: String,
    pub value: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Default)]
struct LedgerState {
    world: HashMap<String, String>,
    log: Vec<LedgerTransaction>,
}

pub struct InMemoryLedger {
    channel: String,
    state: Mutex<LedgerState>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    available: AtomicBool,
}

impl InMemoryLedger {
    pub fn new(channel: impl Into<String>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            channel: channel.into(),
            state: Mutex::new(LedgerState::default()),
            ids,
            clock,
            available: AtomicBool::new(true),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Snapshot of every accepted write, oldest first.
    pub async fn transactions(&self) -> Vec<LedgerTransaction> {
        self.state.lock().await.log.clone()
    }

    fn ensure_available(&self) -> Result<(), LedgerError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(LedgerError::Unavailable(format!(
                "channel '{}' is unreachable",
                self.channel
            )))
        }
    }

    fn record(
        &self,
        state: &mut LedgerState,
        op: LedgerOp,
        entity: &str,
        value: Option<&str>,
    ) -> TransactionId {
        let id = next_id(self.ids.as_ref());
        state.log.push(LedgerTransaction {
            id,
            op,
            entity: entity.to_string(),
            value: value.map(str::to_string),
            at: self.clock.now(),
        });
        id
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn add(&self, entity: &str, value: &str) -> Result<TransactionId, LedgerError> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        if state.world.contains_key(entity) {
            return Err(LedgerError::Rejected(format!("entity '{entity}' already exists")));
        }
        state.world.insert(entity.to_string(), value.to_string());
        Ok(self.record(&mut state, LedgerOp::Add, entity, Some(value)))
    }

    async fn get(&self, entity: &str) -> Result<EntityState, LedgerError> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(match state.world.get(entity) {
            Some(value) => EntityState::Found(value.clone()),
            None => EntityState::NotFound,
        })
    }

    async fn set(&self, entity: &str, value: &str) -> Result<TransactionId, LedgerError> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        match state.world.get_mut(entity) {
            Some(slot) => *slot = value.to_string(),
            None => return Err(LedgerError::EntityNotFound(entity.to_string())),
        }
        Ok(self.record(&mut state, LedgerOp::Set, entity, Some(value)))
    }

    async fn delete(&self, entity: &str) -> Result<TransactionId, LedgerError> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        if state.world.remove(entity).is_none() {
            return Err(LedgerError::EntityNotFound(entity.to_string()));
        }
        Ok(self.record(&mut state, LedgerOp::Delete, entity, None))
    }
}
