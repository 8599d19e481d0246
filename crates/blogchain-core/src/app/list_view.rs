//! ListView - 1 種類の entity の一覧画面
//!
//! Holds a read-only snapshot of the collection in creation order. Each
//! rendered row has one delete affordance. `load()` refreshes the snapshot
//! and can be called again at any time (navigation back to the list).
//!
//! `save_form` / `confirm_delete` run the child component's action and then
//! reload, so control returns here with the count already adjusted. Once the
//! action has committed it is reported as a success; a failed reload only
//! leaves an error alert and the previous rows.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::confirm_dialog::{ConfirmationDialog, DialogError};
use crate::app::edit_form::{EditForm, FormError, FormMode};
use crate::app::resource::{EntityResource, ResourceError};
use crate::domain::{Alert, Entity, Id, Record};

pub struct ListView<E: Entity> {
    resource: Arc<EntityResource<E>>,
    rows: Vec<Record<E>>,
    alerts: Vec<Alert>,
}

impl<E: Entity> ListView<E> {
    pub fn new(resource: Arc<EntityResource<E>>) -> Self {
        Self {
            resource,
            rows: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn title(&self) -> String {
        self.resource.keys().home_title()
    }

    /// Fetch the collection. On failure the previous rows stay rendered.
    pub async fn load(&mut self) -> Result<&[Record<E>], ResourceError> {
        match self.resource.list().await {
            Ok(rows) => {
                debug!(entity = E::KIND, rows = rows.len(), "list loaded");
                self.rows = rows;
                Ok(&self.rows)
            }
            Err(err) => {
                self.alerts.push(self.resource.error_alert(&err));
                Err(err)
            }
        }
    }

    pub fn rows(&self) -> std::slice::Iter<'_, Record<E>> {
        self.rows.iter()
    }

    pub fn count_delete_affordances(&self) -> usize {
        self.rows.len()
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    pub fn click_create(&self) -> EditForm<E> {
        EditForm::open(self.resource.clone(), FormMode::Create)
    }

    /// Open the edit form on the stored version of `id`.
    pub async fn click_edit(&self, id: Id<E::Marker>) -> Result<EditForm<E>, ResourceError> {
        let record = self.resource.get(id).await?;
        Ok(EditForm::open(self.resource.clone(), FormMode::Edit(record)))
    }

    /// Open the delete dialog for a rendered row.
    pub fn click_delete(&self, id: Id<E::Marker>) -> Result<ConfirmationDialog<E>, ResourceError> {
        let record = self
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                entity: E::KIND,
                id: id.to_string(),
            })?;
        Ok(ConfirmationDialog::for_record(self.resource.clone(), record))
    }

    /// Open the delete dialog for the last rendered row.
    pub fn click_last_delete(&self) -> Option<ConfirmationDialog<E>> {
        self.rows
            .last()
            .cloned()
            .map(|record| ConfirmationDialog::for_record(self.resource.clone(), record))
    }

    /// Reload after a committed action. The failure is already an alert.
    async fn refresh(&mut self) {
        if let Err(err) = self.load().await {
            warn!(entity = E::KIND, error = %err, "list reload failed, showing previous rows");
        }
    }

    /// Save `form` and come back to a refreshed list.
    pub async fn save_form(&mut self, form: &mut EditForm<E>) -> Result<Record<E>, FormError> {
        let result = form.save().await;
        self.alerts.extend(form.take_alerts());
        let record = result?;
        self.refresh().await;
        Ok(record)
    }

    /// Confirm `dialog` and come back to a refreshed list.
    pub async fn confirm_delete(
        &mut self,
        dialog: &mut ConfirmationDialog<E>,
    ) -> Result<Id<E::Marker>, DialogError> {
        let result = dialog.confirm().await;
        self.alerts.extend(dialog.take_alerts());
        let id = result?;
        self.refresh().await;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Tag, TagField, TagId};
    use crate::impls::InMemoryEntityStore;
    use crate::ports::{EntityStore, StoreError, SystemClock, UlidGenerator};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use ulid::Ulid;

    /// Writes commit; once `armed`, the first committed write takes listing down.
    struct ListingOutageAfterWrite {
        inner: InMemoryEntityStore<Tag>,
        armed: AtomicBool,
        listing_down: AtomicBool,
    }

    impl ListingOutageAfterWrite {
        fn new() -> Self {
            Self {
                inner: InMemoryEntityStore::new(Arc::new(UlidGenerator::new(SystemClock))),
                armed: AtomicBool::new(false),
                listing_down: AtomicBool::new(false),
            }
        }

        fn after_write(&self) {
            if self.armed.load(Ordering::SeqCst) {
                self.listing_down.store(true, Ordering::SeqCst);
            }
        }

        fn restore(&self) {
            self.armed.store(false, Ordering::SeqCst);
            self.listing_down.store(false, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl EntityStore<Tag> for ListingOutageAfterWrite {
        async fn insert(&self, fields: Tag) -> Result<Record<Tag>, StoreError> {
            let record = self.inner.insert(fields).await?;
            self.after_write();
            Ok(record)
        }

        async fn update(&self, record: Record<Tag>) -> Result<Record<Tag>, StoreError> {
            let record = self.inner.update(record).await?;
            self.after_write();
            Ok(record)
        }

        async fn find_all(&self) -> Result<Vec<Record<Tag>>, StoreError> {
            if self.listing_down.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("listing down".into()));
            }
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: TagId) -> Result<Option<Record<Tag>>, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn delete_by_id(&self, id: TagId) -> Result<bool, StoreError> {
            let deleted = self.inner.delete_by_id(id).await?;
            self.after_write();
            Ok(deleted)
        }
    }

    fn list() -> (ListView<Tag>, Arc<InMemoryEntityStore<Tag>>) {
        let store = Arc::new(InMemoryEntityStore::<Tag>::new(Arc::new(UlidGenerator::new(
            SystemClock,
        ))));
        let resource = Arc::new(EntityResource::new(store.clone(), None, "blogchainApp"));
        (ListView::new(resource), store)
    }

    async fn add(list: &mut ListView<Tag>, name: &str) -> Record<Tag> {
        let mut form = list.click_create();
        form.set_field(TagField::Name(name.into())).unwrap();
        list.save_form(&mut form).await.unwrap()
    }

    #[tokio::test]
    async fn empty_list_loads() {
        let (mut list, _) = list();
        assert!(list.load().await.unwrap().is_empty());
        assert_eq!(list.count_delete_affordances(), 0);
        assert_eq!(list.title(), "blogchainApp.tag.home.title");
    }

    #[tokio::test]
    async fn create_then_delete_moves_count_by_one() {
        let (mut list, _) = list();
        list.load().await.unwrap();
        add(&mut list, "aa").await;
        let before = list.count_delete_affordances();

        let created = add(&mut list, "bb").await;
        assert_eq!(list.count_delete_affordances(), before + 1);
        assert_eq!(list.rows().last(), Some(&created));

        let mut dialog = list.click_last_delete().unwrap();
        assert_eq!(dialog.target(), Some(&created));
        list.confirm_delete(&mut dialog).await.unwrap();

        assert_eq!(list.count_delete_affordances(), before);
        assert!(list.rows().all(|r| r.id != created.id));
    }

    #[tokio::test]
    async fn cancels_leave_count_alone() {
        let (mut list, _) = list();
        let record = add(&mut list, "aa").await;

        let mut form = list.click_create();
        form.set_field(TagField::Name("bb".into())).unwrap();
        form.cancel();
        let mut dialog = list.click_delete(record.id).unwrap();
        dialog.cancel();
        list.load().await.unwrap();

        assert_eq!(list.count_delete_affordances(), 1);
    }

    #[tokio::test]
    async fn click_delete_needs_a_rendered_row() {
        let (list, _) = list();
        assert!(list.click_delete(TagId::from_ulid(Ulid::new())).is_err());
        assert!(list.click_last_delete().is_none());
    }

    #[tokio::test]
    async fn click_edit_reads_back_created_values() {
        let (mut list, _) = list();
        let record = add(&mut list, "rust").await;

        let form = list.click_edit(record.id).await.unwrap();
        assert_eq!(form.draft(), &record.fields);
        assert_eq!(form.editing(), Some(record.id));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_rows() {
        let (mut list, store) = list();
        add(&mut list, "aa").await;
        list.take_alerts();
        store.set_available(false);

        assert!(list.load().await.is_err());
        assert_eq!(list.count_delete_affordances(), 1);
        assert_eq!(list.alerts().len(), 1);
    }

    #[tokio::test]
    async fn invalid_save_keeps_list_untouched() {
        let (mut list, _) = list();
        list.load().await.unwrap();
        let mut form = list.click_create();
        form.set_field(TagField::Name("a".into())).unwrap();

        assert!(matches!(
            list.save_form(&mut form).await,
            Err(FormError::Validation(_))
        ));
        assert!(form.is_open());
        assert_eq!(list.count_delete_affordances(), 0);
    }

    #[tokio::test]
    async fn committed_save_succeeds_even_if_reload_fails() {
        let store = Arc::new(ListingOutageAfterWrite::new());
        let resource = Arc::new(EntityResource::new(store.clone(), None, "app"));
        let mut list = ListView::new(resource);
        list.load().await.unwrap();

        store.armed.store(true, Ordering::SeqCst);
        let mut form = list.click_create();
        form.set_field(TagField::Name("rust".into())).unwrap();
        let record = list.save_form(&mut form).await.unwrap();

        assert!(!form.is_open());
        assert_eq!(store.inner.find_all().await.unwrap(), vec![record.clone()]);
        // stale rows until the next successful load
        assert_eq!(list.count_delete_affordances(), 0);
        let keys: Vec<String> = list.take_alerts().into_iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["app.tag.created", "app.tag.error"]);

        store.restore();
        assert_eq!(list.load().await.unwrap(), &[record][..]);
    }

    #[tokio::test]
    async fn committed_delete_succeeds_even_if_reload_fails() {
        let store = Arc::new(ListingOutageAfterWrite::new());
        let resource = Arc::new(EntityResource::new(store.clone(), None, "app"));
        let mut list = ListView::new(resource);
        let record = add(&mut list, "rust").await;
        list.take_alerts();

        store.armed.store(true, Ordering::SeqCst);
        let mut dialog = list.click_last_delete().unwrap();
        let deleted = list.confirm_delete(&mut dialog).await.unwrap();

        assert_eq!(deleted, record.id);
        assert!(!dialog.is_open());
        assert!(store.inner.find_all().await.unwrap().is_empty());
        let keys: Vec<String> = list.take_alerts().into_iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["app.tag.deleted", "app.tag.error"]);

        store.restore();
        assert!(list.load().await.unwrap().is_empty());
    }
}
