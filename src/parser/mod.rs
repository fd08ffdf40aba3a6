//! HTTP/1.x request parsing.
//!
//! Requests are parsed from a complete byte buffer: request line, headers,
//! and a body bounded by `Content-Length`. [`request_len`] lets a reader
//! decide when that buffer is complete.

mod error;
mod method;
mod request;
mod version;

pub use error::Error;
pub use method::Method;
pub use request::{parse_request, request_len, HttpRequest};
pub use version::HttpVersion;
