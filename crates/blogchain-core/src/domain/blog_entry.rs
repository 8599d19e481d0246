//! BlogEntry entity.
//!
//! Dates are stored as UTC instants. The form works with the
//! `datetime-local` text shape (`2001-01-01T02:30`), so parsing and
//! formatting for that shape live here next to the field enum.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::errors::{FieldError, ValidationError, Validator};
use super::ids::{BlogEntryKind, BlogId};

/// Input shape of the date field.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogEntry {
    pub title: String,
    pub content: String,
    pub date: Option<DateTime<Utc>>,
    /// Owning blog, if one was selected.
    pub blog: Option<BlogId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogEntryField {
    Title(String),
    Content(String),
    Date(Option<DateTime<Utc>>),
    Blog(Option<BlogId>),
}

impl BlogEntryField {
    /// Parse a `datetime-local` style value into a `Date` field.
    ///
    /// Seconds and a full RFC 3339 timestamp are accepted too.
    pub fn date_input(input: &str) -> Result<Self, FieldError> {
        parse_date_input(input).map(|date| BlogEntryField::Date(Some(date)))
    }
}

fn parse_date_input(input: &str) -> Result<DateTime<Utc>, FieldError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FieldError::Required { field: "date" });
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, DATE_INPUT_FORMAT) {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FieldError::Invalid {
            field: "date",
            reason: e.to_string(),
        })
}

impl BlogEntry {
    /// The date rendered back in input shape, as the form shows it.
    pub fn date_input(&self) -> Option<String> {
        self.date
            .map(|date| date.format(DATE_INPUT_FORMAT).to_string())
    }
}

impl Entity for BlogEntry {
    const KIND: &'static str = "blogEntry";

    type Marker = BlogEntryKind;
    type Field = BlogEntryField;

    fn apply(&mut self, field: BlogEntryField) {
        match field {
            BlogEntryField::Title(title) => self.title = title,
            BlogEntryField::Content(content) => self.content = content,
            BlogEntryField::Date(date) => self.date = date,
            BlogEntryField::Blog(blog) => self.blog = blog,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new(Self::KIND)
            .text("title", &self.title, 1)
            .text("content", &self.content, 1)
            .present("date", self.date.as_ref())
            .finish()
    }
}
