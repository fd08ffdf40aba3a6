//! User resource store.
//!
//! This module holds the authoritative in-memory list of users together with
//! the id counter, and the (decorative) connection settings for a backing
//! database.

mod config;
mod error;
mod memory;
mod user;

// Re-export public items
pub use config::DatabaseConfig;
pub use error::Error;
pub use memory::{SharedUserStore, UserStore};
pub use user::User;
