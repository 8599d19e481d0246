//! Entity trait and stored record.
//!
//! An `Entity` is the typed field set of one kind (blog, blog entry, tag).
//! The store pairs it with an id to form a `Record`. Drafts held by the edit
//! form are plain `Entity` values with no id.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::errors::ValidationError;
use super::ids::{Id, IdMarker};

/// Entity は種類ごとのフィールド集合を表す
///
/// # Associated items
/// - `KIND`: log/alert で使う名前（例: `"blogEntry"`）
/// - `Marker`: この種類の ID マーカー
/// - `Field`: edit form が受け付ける型付きフィールド（dynamic key/value の代わり）
pub trait Entity:
    Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// i18n / log name of this kind.
    const KIND: &'static str;

    type Marker: IdMarker;

    type Field: Debug + Clone + Send;

    /// Apply one field value to the draft.
    fn apply(&mut self, field: Self::Field);

    /// Check required fields and length rules.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A committed entity: store-assigned id plus fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Record<E: Entity> {
    pub id: Id<E::Marker>,
    #[serde(flatten)]
    pub fields: E,
}

impl<E: Entity> Record<E> {
    pub fn new(id: Id<E::Marker>, fields: E) -> Self {
        Self { id, fields }
    }

    /// Ledger key of this record (the id's display form).
    pub fn ledger_key(&self) -> String {
        self.id.to_string()
    }

    /// Ledger value of this record.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
