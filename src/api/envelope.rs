//! The JSON response envelope.

use serde::{Deserialize, Serialize};

use crate::server::{Error, HttpResponse, StatusCode};

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// A response body of the form `{"status", "message", "data"?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// A successful envelope carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Serialize into an HTTP response with the given status code.
    pub fn into_response(self, status: StatusCode) -> Result<HttpResponse, Error> {
        HttpResponse::json(status, &self)
    }
}

impl Envelope<()> {
    /// A successful envelope without data.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: None,
        }
    }

    /// An error envelope.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: None,
        }
    }
}
