//! API-level errors and their HTTP mapping.

use thiserror::Error;

use crate::api::envelope::Envelope;
use crate::parser::Error as ParserError;
use crate::server::{Error as ServerError, HttpResponse, StatusCode};
use crate::store::Error as StoreError;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed user does not exist.
    #[error("User not found")]
    NotFound(#[from] StoreError),

    /// The `{id}` path segment is not a valid user id.
    #[error("Invalid user ID")]
    InvalidId(String),

    /// The request body could not be decoded.
    #[error("Invalid JSON payload")]
    InvalidBody(#[from] ParserError),

    /// Anything else.
    #[error("Internal server error")]
    Internal(#[from] ServerError),
}

impl ApiError {
    /// The HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NotFound,
            ApiError::InvalidId(_) | ApiError::InvalidBody(_) => StatusCode::BadRequest,
            ApiError::Internal(_) => StatusCode::InternalServerError,
        }
    }

    /// Render as an error envelope.
    pub fn into_response(self) -> Result<HttpResponse, ServerError> {
        Envelope::<()>::error(self.to_string()).into_response(self.status_code())
    }
}
