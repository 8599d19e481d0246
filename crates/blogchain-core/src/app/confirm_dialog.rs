//! ConfirmationDialog - 削除の確認ダイアログ
//!
//! State machine: Closed → open(record) → Open → confirm | cancel → Closed.
//! `confirm()` always ends Closed, even when the delete fails; the user has
//! to reopen the dialog to try again.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::app::resource::{EntityResource, ResourceError};
use crate::domain::{Alert, Entity, Id, Record};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("dialog is not open")]
    NotOpen,

    #[error("dialog is already open for {0}")]
    AlreadyOpen(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState<E: Entity> {
    Closed,
    Open(Record<E>),
}

pub struct ConfirmationDialog<E: Entity> {
    resource: Arc<EntityResource<E>>,
    state: DialogState<E>,
    alerts: Vec<Alert>,
}

impl<E: Entity> ConfirmationDialog<E> {
    pub fn new(resource: Arc<EntityResource<E>>) -> Self {
        Self {
            resource,
            state: DialogState::Closed,
            alerts: Vec::new(),
        }
    }

    /// A dialog already open on `record`.
    pub fn for_record(resource: Arc<EntityResource<E>>, record: Record<E>) -> Self {
        Self {
            resource,
            state: DialogState::Open(record),
            alerts: Vec::new(),
        }
    }

    pub fn state(&self) -> &DialogState<E> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    pub fn target(&self) -> Option<&Record<E>> {
        match &self.state {
            DialogState::Open(record) => Some(record),
            DialogState::Closed => None,
        }
    }

    pub fn title(&self) -> String {
        self.resource.keys().delete_question()
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    pub fn open(&mut self, record: Record<E>) -> Result<(), DialogError> {
        if let DialogState::Open(current) = &self.state {
            return Err(DialogError::AlreadyOpen(current.id.to_string()));
        }
        self.state = DialogState::Open(record);
        Ok(())
    }

    /// Delete the target and close.
    pub async fn confirm(&mut self) -> Result<Id<E::Marker>, DialogError> {
        let record = match std::mem::replace(&mut self.state, DialogState::Closed) {
            DialogState::Open(record) => record,
            DialogState::Closed => return Err(DialogError::NotOpen),
        };

        match self.resource.delete(record.id).await {
            Ok(()) => {
                self.alerts.push(self.resource.deleted_alert(record.id));
                Ok(record.id)
            }
            Err(err) => {
                debug!(entity = E::KIND, id = %record.id, error = %err, "delete failed");
                self.alerts.push(self.resource.error_alert(&err));
                Err(err.into())
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tag;
    use crate::impls::InMemoryEntityStore;
    use crate::ports::{EntityStore, StoreError, SystemClock, UlidGenerator};

    async fn seeded() -> (
        Arc<EntityResource<Tag>>,
        Arc<InMemoryEntityStore<Tag>>,
        Record<Tag>,
    ) {
        let store = Arc::new(InMemoryEntityStore::<Tag>::new(Arc::new(UlidGenerator::new(
            SystemClock,
        ))));
        let resource = Arc::new(EntityResource::new(store.clone(), None, "blogchainApp"));
        let record = resource.create(Tag { name: "rust".into() }).await.unwrap();
        (resource, store, record)
    }

    #[tokio::test]
    async fn confirm_deletes_exactly_the_target() {
        let (resource, _, record) = seeded().await;
        let other = resource.create(Tag { name: "go".into() }).await.unwrap();
        let mut dialog = ConfirmationDialog::new(resource.clone());
        assert_eq!(dialog.title(), "blogchainApp.tag.delete.question");

        dialog.open(record.clone()).unwrap();
        assert_eq!(dialog.target(), Some(&record));

        let deleted = dialog.confirm().await.unwrap();

        assert_eq!(deleted, record.id);
        assert_eq!(dialog.state(), &DialogState::Closed);
        assert_eq!(resource.list().await.unwrap(), vec![other]);
        assert_eq!(dialog.take_alerts()[0].key, "blogchainApp.tag.deleted");
    }

    #[tokio::test]
    async fn cancel_closes_without_mutation() {
        let (resource, _, record) = seeded().await;
        let mut dialog = ConfirmationDialog::new(resource.clone());
        dialog.open(record).unwrap();

        dialog.cancel();

        assert!(!dialog.is_open());
        assert_eq!(resource.count().await.unwrap(), 1);
        assert_eq!(dialog.confirm().await, Err(DialogError::NotOpen));
    }

    #[tokio::test]
    async fn for_record_starts_open() {
        let (resource, _, record) = seeded().await;
        let mut dialog = ConfirmationDialog::for_record(resource.clone(), record.clone());

        assert_eq!(dialog.state(), &DialogState::Open(record.clone()));
        assert_eq!(dialog.confirm().await.unwrap(), record.id);
        assert_eq!(resource.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn second_open_is_refused() {
        let (resource, _, record) = seeded().await;
        let mut dialog = ConfirmationDialog::new(resource);
        dialog.open(record.clone()).unwrap();

        let err = dialog.open(record.clone()).unwrap_err();
        assert_eq!(err, DialogError::AlreadyOpen(record.id.to_string()));
        assert_eq!(dialog.target(), Some(&record));
    }

    #[tokio::test]
    async fn failed_delete_still_closes() {
        let (resource, store, record) = seeded().await;
        let mut dialog = ConfirmationDialog::new(resource);
        dialog.open(record).unwrap();
        store.set_available(false);

        let err = dialog.confirm().await.unwrap_err();

        assert!(matches!(
            err,
            DialogError::Resource(ResourceError::Store(StoreError::Unavailable(_)))
        ));
        assert!(!dialog.is_open());
        assert_eq!(dialog.take_alerts()[0].key, "blogchainApp.tag.error");

        store.set_available(true);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
