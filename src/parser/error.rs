//! Parser errors.

use thiserror::Error;

/// Why a request could not be parsed or its body decoded.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Empty request")]
    Empty,

    /// The request head contains bytes that are not UTF-8.
    #[error("Request head is not valid UTF-8")]
    NotUtf8,

    /// The request line is not `METHOD PATH VERSION`.
    #[error("Malformed request line: {0:?}")]
    BadRequestLine(String),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Unsupported HTTP version: {0}")]
    UnsupportedVersion(String),

    /// A header line without a `:` separator.
    #[error("Malformed header line: {0:?}")]
    BadHeader(String),

    /// HTTP/1.1 requests must carry a `Host` header.
    #[error("Missing Host header")]
    MissingHost,

    /// Fewer body bytes arrived than `Content-Length` announced.
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// The body is labelled with a content type other than JSON.
    #[error("Expected a JSON body, got {0}")]
    NotJson(String),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}
