//! Alerts - 操作結果のユーザー向け通知
//!
//! Keys follow `<app>.<entity>.<action>` so a front end can translate them.
//! Success alerts carry the record id as their parameter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub key: String,
    pub param: Option<String>,
}

/// Builds translation keys for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nKeys {
    app: String,
    entity: &'static str,
}

impl I18nKeys {
    pub fn new(app: impl Into<String>, entity: &'static str) -> Self {
        Self {
            app: app.into(),
            entity,
        }
    }

    pub fn key(&self, suffix: &str) -> String {
        format!("{}.{}.{}", self.app, self.entity, suffix)
    }

    pub fn home_title(&self) -> String {
        self.key("home.title")
    }

    pub fn create_or_edit_label(&self) -> String {
        self.key("home.createOrEditLabel")
    }

    pub fn delete_question(&self) -> String {
        self.key("delete.question")
    }

    pub fn success(&self, action: &str, id: impl ToString) -> Alert {
        Alert {
            level: AlertLevel::Success,
            key: self.key(action),
            param: Some(id.to_string()),
        }
    }

    pub fn error(&self, reason: impl Into<String>) -> Alert {
        Alert {
            level: AlertLevel::Error,
            key: self.key("error"),
            param: Some(reason.into()),
        }
    }
}
