//! The user record.

use serde::{Deserialize, Serialize};

/// A user record.
///
/// Every field defaults when missing from a JSON payload, so request bodies
/// may omit the `id` (which the store assigns anyway).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Store-assigned identifier.
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl User {
    /// Create a user without an id.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Set the id.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}
