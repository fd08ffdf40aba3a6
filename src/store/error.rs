//! Error types for the user store.

use thiserror::Error;

/// Errors raised by [`UserStore`](crate::store::UserStore) operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No user with the given id exists.
    #[error("User not found: {0}")]
    NotFound(u64),
}
