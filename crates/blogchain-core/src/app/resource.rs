//! EntityResource - 1 種類の entity の CRUD サービス
//!
//! Store writes are mirrored to the ledger through [`ChaincodeService`].
//! Mirroring is best effort: a ledger failure is logged and the CRUD result
//! stands.
//!
//! Ordering per operation:
//! - create: validate → store insert → ledger add
//! - update: validate → ledger set → store update
//! - delete: ledger delete → store delete

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::app::chaincode::{ChaincodeError, ChaincodeService, TransactionReceipt};
use crate::domain::{Alert, Entity, I18nKeys, Id, Record, ValidationError};
use crate::ports::{EntityStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(StoreError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl From<StoreError> for ResourceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ResourceError::NotFound { entity, id },
            other => ResourceError::Store(other),
        }
    }
}

pub struct EntityResource<E: Entity> {
    store: Arc<dyn EntityStore<E>>,
    ledger: Option<ChaincodeService>,
    keys: I18nKeys,
}

impl<E: Entity> EntityResource<E> {
    /// `ledger = None` disables mirroring.
    pub fn new(
        store: Arc<dyn EntityStore<E>>,
        ledger: Option<ChaincodeService>,
        app_name: &str,
    ) -> Self {
        Self {
            store,
            ledger,
            keys: I18nKeys::new(app_name, E::KIND),
        }
    }

    pub fn keys(&self) -> &I18nKeys {
        &self.keys
    }

    pub fn created_alert(&self, id: Id<E::Marker>) -> Alert {
        self.keys.success("created", id)
    }

    pub fn updated_alert(&self, id: Id<E::Marker>) -> Alert {
        self.keys.success("updated", id)
    }

    pub fn deleted_alert(&self, id: Id<E::Marker>) -> Alert {
        self.keys.success("deleted", id)
    }

    pub fn error_alert(&self, err: &impl std::fmt::Display) -> Alert {
        self.keys.error(err.to_string())
    }

    pub async fn create(&self, fields: E) -> Result<Record<E>, ResourceError> {
        debug!(entity = E::KIND, ?fields, "request to save");
        fields.validate()?;

        let record = self.store.insert(fields).await?;

        if let Some(ledger) = &self.ledger {
            match record.to_json() {
                Ok(value) => {
                    debug!(key = %record.id, %value, "BLOCKCHAIN ADD");
                    let response = ledger.add(&record.ledger_key(), &value).await;
                    self.log_mirror("add", &record.ledger_key(), response);
                }
                Err(e) => warn!(entity = E::KIND, error = %e, "cannot encode record for ledger"),
            }
        }
        Ok(record)
    }

    pub async fn update(&self, record: Record<E>) -> Result<Record<E>, ResourceError> {
        debug!(entity = E::KIND, ?record, "request to update");
        record.fields.validate()?;

        if let Some(ledger) = &self.ledger {
            match record.to_json() {
                Ok(value) => {
                    debug!(key = %record.id, %value, "BLOCKCHAIN UPDATE");
                    let response = ledger.set(&record.ledger_key(), &value).await;
                    self.log_mirror("set", &record.ledger_key(), response);
                }
                Err(e) => warn!(entity = E::KIND, error = %e, "cannot encode record for ledger"),
            }
        }

        Ok(self.store.update(record).await?)
    }

    pub async fn list(&self) -> Result<Vec<Record<E>>, ResourceError> {
        debug!(entity = E::KIND, "request to get all");
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: Id<E::Marker>) -> Result<Record<E>, ResourceError> {
        debug!(entity = E::KIND, %id, "request to get");
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ResourceError::NotFound {
                entity: E::KIND,
                id: id.to_string(),
            })
    }

    pub async fn delete(&self, id: Id<E::Marker>) -> Result<(), ResourceError> {
        debug!(entity = E::KIND, %id, "request to delete");

        if let Some(ledger) = &self.ledger {
            let key = id.to_string();
            debug!(%key, "BLOCKCHAIN DELETE");
            let response = ledger.delete(&key).await;
            self.log_mirror("delete", &key, response);
        }

        if self.store.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(ResourceError::NotFound {
                entity: E::KIND,
                id: id.to_string(),
            })
        }
    }

    pub async fn count(&self) -> Result<usize, ResourceError> {
        Ok(self.store.count().await?)
    }

    fn log_mirror(&self, op: &str, key: &str, response: Result<TransactionReceipt, ChaincodeError>) {
        match response {
            Ok(receipt) => info!(
                entity = E::KIND,
                op,
                key,
                transaction = %receipt.transaction_id,
                "ledger mirrored"
            ),
            Err(err) => warn!(
                entity = E::KIND,
                op,
                key,
                status = err.status_code(),
                error = %err,
                "ledger mirroring failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Blog, Tag, TagId};
    use crate::impls::{InMemoryEntityStore, InMemoryLedger, LedgerOp};
    use crate::ports::{EntityState, Ledger, SystemClock, UlidGenerator};
    use ulid::Ulid;

    struct Fixture<E: Entity> {
        resource: EntityResource<E>,
        store: Arc<InMemoryEntityStore<E>>,
        ledger: Arc<InMemoryLedger>,
    }

    fn fixture<E: Entity>() -> Fixture<E> {
        let ids = Arc::new(UlidGenerator::new(SystemClock));
        let store = Arc::new(InMemoryEntityStore::<E>::new(ids.clone()));
        let ledger = Arc::new(InMemoryLedger::new("mychannel", ids, Arc::new(SystemClock)));
        let resource = EntityResource::new(
            store.clone(),
            Some(ChaincodeService::new(ledger.clone())),
            "blogchainApp",
        );
        Fixture {
            resource,
            store,
            ledger,
        }
    }

    fn blog(name: &str) -> Blog {
        Blog {
            name: name.into(),
            handle: "me".into(),
        }
    }

    #[tokio::test]
    async fn create_stores_and_mirrors() {
        let fx = fixture::<Blog>();
        let record = fx.resource.create(blog("first blog")).await.unwrap();

        assert_eq!(fx.resource.list().await.unwrap(), vec![record.clone()]);
        let state = fx.ledger.get(&record.ledger_key()).await.unwrap();
        assert_eq!(state, EntityState::Found(record.to_json().unwrap()));
    }

    #[tokio::test]
    async fn invalid_create_touches_nothing() {
        let fx = fixture::<Blog>();
        let err = fx.resource.create(blog("ab")).await.unwrap_err();

        assert!(matches!(err, ResourceError::Validation(_)));
        assert_eq!(fx.resource.count().await.unwrap(), 0);
        assert!(fx.ledger.transactions().await.is_empty());
    }

    #[tokio::test]
    async fn update_rewrites_ledger_value() {
        let fx = fixture::<Blog>();
        let mut record = fx.resource.create(blog("first blog")).await.unwrap();
        record.fields.name = "renamed blog".into();

        let updated = fx.resource.update(record.clone()).await.unwrap();
        assert_eq!(fx.resource.get(record.id).await.unwrap(), updated);

        let ops: Vec<LedgerOp> = fx.ledger.transactions().await.iter().map(|t| t.op).collect();
        assert_eq!(ops, vec![LedgerOp::Add, LedgerOp::Set]);
    }

    #[tokio::test]
    async fn update_of_unknown_record_is_not_found() {
        let fx = fixture::<Tag>();
        let ghost = Record::new(TagId::from_ulid(Ulid::new()), Tag { name: "ghost".into() });
        let err = fx.resource.update(ghost).await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { entity: "tag", .. }));
    }

    #[tokio::test]
    async fn delete_removes_from_store_and_ledger() {
        let fx = fixture::<Tag>();
        let record = fx.resource.create(Tag { name: "rust".into() }).await.unwrap();

        fx.resource.delete(record.id).await.unwrap();

        assert_eq!(fx.resource.count().await.unwrap(), 0);
        assert_eq!(
            fx.ledger.get(&record.ledger_key()).await.unwrap(),
            EntityState::NotFound
        );
        assert!(matches!(
            fx.resource.delete(record.id).await,
            Err(ResourceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn ledger_outage_does_not_block_crud() {
        let fx = fixture::<Tag>();
        fx.ledger.set_available(false);

        let record = fx.resource.create(Tag { name: "rust".into() }).await.unwrap();
        fx.resource.delete(record.id).await.unwrap();
        assert!(fx.ledger.transactions().await.is_empty());
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_store_error() {
        let fx = fixture::<Tag>();
        fx.store.set_available(false);

        let err = fx.resource.create(Tag { name: "rust".into() }).await.unwrap_err();
        assert!(matches!(err, ResourceError::Store(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn mirroring_can_be_disabled() {
        let ids = Arc::new(UlidGenerator::new(SystemClock));
        let store = Arc::new(InMemoryEntityStore::<Tag>::new(ids));
        let resource = EntityResource::new(store, None, "blogchainApp");

        let record = resource.create(Tag { name: "rust".into() }).await.unwrap();
        assert_eq!(resource.get(record.id).await.unwrap(), record);
    }

    #[test]
    fn alerts_use_entity_keys() {
        let fx = fixture::<Tag>();
        let id = TagId::from_ulid(Ulid::new());
        let alert = fx.resource.deleted_alert(id);
        assert_eq!(alert.key, "blogchainApp.tag.deleted");
        assert_eq!(alert.param, Some(id.to_string()));
    }
}
