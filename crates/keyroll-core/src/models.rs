//! Shared data types for the application.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A free-text annotation attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The kind of account a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordType {
    /// Networked directory account; carries a secret.
    #[serde(rename = "directory")]
    Directory,
    /// Local account; never carries a secret.
    #[serde(rename = "local")]
    Local,
    /// Not chosen yet.
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl RecordType {
    /// Types offered by the type selector. `Unset` is not selectable.
    pub const SELECTABLE: [RecordType; 2] = [RecordType::Directory, RecordType::Local];

    /// Wire value, as stored in the persisted document.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Directory => "directory",
            RecordType::Local => "local",
            RecordType::Unset => "",
        }
    }

    /// Parse a wire value. Unknown values yield `None`.
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "directory" => Some(RecordType::Directory),
            "local" => Some(RecordType::Local),
            "" => Some(RecordType::Unset),
            _ => None,
        }
    }

    /// Human readable name for the selector.
    pub fn label(self) -> &'static str {
        match self {
            RecordType::Directory => "Directory",
            RecordType::Local => "Local",
            RecordType::Unset => "",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Represents a persisted account record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(default)]
    pub tags: Vec<Label>,
    #[serde(rename = "type", default)]
    pub record_type: RecordType,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub secret: Option<String>,
}

impl Record {
    /// Create an empty record for new row creation.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Merge the set fields of `patch` into this record.
    pub fn apply(&mut self, patch: RecordPatch) {
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(record_type) = patch.record_type {
            self.record_type = record_type;
        }
        if let Some(login) = patch.login {
            self.login = login;
        }
        if let Some(secret) = patch.secret {
            self.secret = secret;
        }
    }
}

/// A partial update for a record. `None` leaves the field untouched.
///
/// `secret` is doubly optional: `Some(None)` clears the secret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub tags: Option<Vec<Label>>,
    pub record_type: Option<RecordType>,
    pub login: Option<String>,
    pub secret: Option<Option<String>>,
}

impl RecordPatch {
    pub fn tags(tags: Vec<Label>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }

    pub fn record_type(record_type: RecordType) -> Self {
        Self {
            record_type: Some(record_type),
            ..Self::default()
        }
    }

    pub fn login(login: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
            ..Self::default()
        }
    }

    pub fn secret(secret: Option<String>) -> Self {
        Self {
            secret: Some(secret),
            ..Self::default()
        }
    }
}
