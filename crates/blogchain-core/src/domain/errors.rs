//! Errors - ドメインのエラー型
//!
//! Validation happens on the draft before anything reaches a store, so a
//! failed save never leaves a partial commit behind.

use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} has an invalid value: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Required { field }
            | FieldError::TooShort { field, .. }
            | FieldError::Invalid { field, .. } => field,
        }
    }
}

/// ValidationError は draft の検証結果（全フィールド分のエラーを保持）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for {entity}: {}", describe(.errors))]
pub struct ValidationError {
    pub entity: &'static str,
    pub errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Whether `field` is among the failing fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }
}

/// Collects field errors while an entity checks its own draft.
#[derive(Debug)]
pub struct Validator {
    entity: &'static str,
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            errors: Vec::new(),
        }
    }

    /// Non-blank text with at least `min` characters.
    pub fn text(&mut self, field: &'static str, value: &str, min: usize) -> &mut Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.errors.push(FieldError::Required { field });
        } else if trimmed.chars().count() < min {
            self.errors.push(FieldError::TooShort { field, min });
        }
        self
    }

    pub fn present<T>(&mut self, field: &'static str, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            self.errors.push(FieldError::Required { field });
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                entity: self.entity,
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}
