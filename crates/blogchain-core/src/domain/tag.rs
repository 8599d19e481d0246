//! Tag entity.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::errors::{ValidationError, Validator};
use super::ids::TagKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagField {
    Name(String),
}

impl Entity for Tag {
    const KIND: &'static str = "tag";

    type Marker = TagKind;
    type Field = TagField;

    fn apply(&mut self, field: TagField) {
        match field {
            TagField::Name(name) => self.name = name,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new(Self::KIND).text("name", &self.name, 2).finish()
    }
}
