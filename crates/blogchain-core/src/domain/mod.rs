//! Domain model (IDs, entities, records, validation, alerts).

pub mod alert;
pub mod blog;
pub mod blog_entry;
pub mod entity;
pub mod errors;
pub mod ids;
pub mod tag;

pub use self::alert::{Alert, AlertLevel, I18nKeys};
pub use self::blog::{Blog, BlogField};
pub use self::blog_entry::{BlogEntry, BlogEntryField, DATE_INPUT_FORMAT};
pub use self::entity::{Entity, Record};
pub use self::errors::{FieldError, ValidationError, Validator};
pub use self::ids::{BlogEntryId, BlogId, Id, IdMarker, ParseIdError, TagId, TransactionId};
pub use self::tag::{Tag, TagField};
