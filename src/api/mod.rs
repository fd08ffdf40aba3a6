//! REST API for user records.
//!
//! Translates HTTP requests into [`UserStore`](crate::store::UserStore) calls
//! and wraps every result in a uniform JSON [`Envelope`].

mod envelope;
mod error;
mod handlers;
mod routes;
mod tests;

// Re-export public items
pub use envelope::{Envelope, Status};
pub use error::ApiError;
pub use handlers::{
    api_info, create_user, delete_user, get_user, health_check, list_users, update_user,
    SERVICE_NAME,
};
pub use routes::{register_routes, API_PREFIX};
