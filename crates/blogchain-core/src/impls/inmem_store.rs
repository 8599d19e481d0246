//! InMemoryEntityStore - 開発用・テスト用の entity store
//!
//! # 実装詳細
//! - IndexMap<Id, Record> で作成順を保持（delete は shift_remove）
//! - tokio::sync::Mutex で排他制御
//! - `set_available(false)` で障害を再現できる

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::Mutex;

use crate::domain::{Entity, Id, Record};
use crate::ports::{EntityStore, IdGenerator, StoreError, next_id};

pub struct InMemoryEntityStore<E: Entity> {
    records: Mutex<IndexMap<Id<E::Marker>, Record<E>>>,
    ids: Arc<dyn IdGenerator>,
    available: AtomicBool,
}

impl<E: Entity> InMemoryEntityStore<E> {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            records: Mutex::new(IndexMap::new()),
            ids,
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!("{} store is offline", E::KIND)))
        }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryEntityStore<E> {
    async fn insert(&self, fields: E) -> Result<Record<E>, StoreError> {
        self.ensure_available()?;
        let mut records = self.records.lock().await;
        let mut id = next_id::<E::Marker>(self.ids.as_ref());
        while records.contains_key(&id) {
            id = next_id::<E::Marker>(self.ids.as_ref());
        }
        let record = Record::new(id, fields);
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: Record<E>) -> Result<Record<E>, StoreError> {
        self.ensure_available()?;
        let mut records = self.records.lock().await;
        match records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(StoreError::NotFound {
                entity: E::KIND,
                id: record.id.to_string(),
            }),
        }
    }

    async fn find_all(&self) -> Result<Vec<Record<E>>, StoreError> {
        self.ensure_available()?;
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Id<E::Marker>) -> Result<Option<Record<E>>, StoreError> {
        self.ensure_available()?;
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: Id<E::Marker>) -> Result<bool, StoreError> {
        self.ensure_available()?;
        Ok(self.records.lock().await.shift_remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.ensure_available()?;
        Ok(self.records.lock().await.len())
    }
}
