//! EditForm - draft を 1 件だけ所有する作成・編集フォーム
//!
//! Field changes only touch the local draft. `save()` validates and submits;
//! on failure the form stays open with the draft intact so the user can fix
//! it and retry. `cancel()` (or dropping the form) discards the draft.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::app::resource::{EntityResource, ResourceError};
use crate::domain::{Alert, Entity, Id, Record, ValidationError};
use crate::ports::StoreError;

/// How a form is opened.
#[derive(Debug, Clone)]
pub enum FormMode<E: Entity> {
    Create,
    Edit(Record<E>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("form is closed")]
    Closed,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(StoreError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl From<ResourceError> for FormError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::Validation(e) => FormError::Validation(e),
            ResourceError::Store(e) => FormError::Store(e),
            ResourceError::NotFound { entity, id } => FormError::NotFound { entity, id },
        }
    }
}

pub struct EditForm<E: Entity> {
    resource: Arc<EntityResource<E>>,
    editing: Option<Id<E::Marker>>,
    draft: E,
    open: bool,
    last_error: Option<FormError>,
    alerts: Vec<Alert>,
}

impl<E: Entity> EditForm<E> {
    pub fn open(resource: Arc<EntityResource<E>>, mode: FormMode<E>) -> Self {
        let (editing, draft) = match mode {
            FormMode::Create => (None, E::default()),
            FormMode::Edit(record) => (Some(record.id), record.fields),
        };
        Self {
            resource,
            editing,
            draft,
            open: true,
            last_error: None,
            alerts: Vec::new(),
        }
    }

    /// The record under edit, `None` in create mode.
    pub fn editing(&self) -> Option<Id<E::Marker>> {
        self.editing
    }

    pub fn is_create(&self) -> bool {
        self.editing.is_none()
    }

    pub fn title(&self) -> String {
        self.resource.keys().create_or_edit_label()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the save button is rendered.
    pub fn is_save_present(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &E {
        &self.draft
    }

    /// Error reported by the last failed `save()`.
    pub fn last_error(&self) -> Option<&FormError> {
        self.last_error.as_ref()
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    pub fn set_field(&mut self, field: E::Field) -> Result<(), FormError> {
        if !self.open {
            return Err(FormError::Closed);
        }
        self.draft.apply(field);
        Ok(())
    }

    /// Apply several fields at once.
    pub fn set_fields(
        &mut self,
        fields: impl IntoIterator<Item = E::Field>,
    ) -> Result<(), FormError> {
        for field in fields {
            self.set_field(field)?;
        }
        Ok(())
    }

    pub async fn save(&mut self) -> Result<Record<E>, FormError> {
        if !self.open {
            return Err(FormError::Closed);
        }

        let result = match self.editing {
            None => self.resource.create(self.draft.clone()).await,
            Some(id) => {
                self.resource
                    .update(Record::new(id, self.draft.clone()))
                    .await
            }
        };

        match result {
            Ok(record) => {
                let alert = if self.editing.is_some() {
                    self.resource.updated_alert(record.id)
                } else {
                    self.resource.created_alert(record.id)
                };
                self.alerts.push(alert);
                self.open = false;
                self.last_error = None;
                Ok(record)
            }
            Err(err) => {
                debug!(entity = E::KIND, error = %err, "save failed, form stays open");
                let err = FormError::from(err);
                // validation problems are shown inline, not as an alert
                if !matches!(err, FormError::Validation(_)) {
                    self.alerts.push(self.resource.error_alert(&err));
                }
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.open = false;
        self.draft = E::default();
        self.last_error = None;
    }
}
