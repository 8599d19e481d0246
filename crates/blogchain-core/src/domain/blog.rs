//! Blog entity.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::errors::{ValidationError, Validator};
use super::ids::BlogKind;

/// A blog owned by a user handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub name: String,
    pub handle: String,
}

/// Editable fields of a [`Blog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogField {
    Name(String),
    Handle(String),
}

impl Entity for Blog {
    const KIND: &'static str = "blog";

    type Marker = BlogKind;
    type Field = BlogField;

    fn apply(&mut self, field: BlogField) {
        match field {
            BlogField::Name(name) => self.name = name,
            BlogField::Handle(handle) => self.handle = handle,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new(Self::KIND)
            .text("name", &self.name, 3)
            .text("handle", &self.handle, 2)
            .finish()
    }
}
