//! A small CRUD HTTP API for user records.
//!
//! The crate bundles a minimal HTTP/1.x request parser, an async server with
//! pattern-based routing, an in-memory [`UserStore`], and the REST handlers
//! that tie them together.
//!
//! # Routes
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/api/v1/health` | 200 |
//! | GET | `/api/v1/users` | 200 |
//! | POST | `/api/v1/users` | 201 |
//! | GET | `/api/v1/users/{id}` | 200 |
//! | PUT | `/api/v1/users/{id}` | 200 |
//! | DELETE | `/api/v1/users/{id}` | 200 |
//!
//! Every response body is an envelope of the form
//! `{"status": "success" | "error", "message": ..., "data": ...}`.
//!
//! # Examples
//!
//! ## Using the store directly
//!
//! ```
//! use users_api::{StoreError, User, UserStore};
//!
//! let mut store = UserStore::with_seed_users();
//!
//! let bob = store.create(User::new("Bob", "bob@example.com"));
//! assert_eq!(bob.id, 3);
//!
//! store.delete(1).unwrap();
//! assert_eq!(store.get(1), Err(StoreError::NotFound(1)));
//! ```
//!
//! ## Serving the API
//!
//! ```no_run
//! use users_api::{register_routes, HttpServer, ServerConfig, UserStore};
//!
//! # async fn run() -> Result<(), users_api::ServerError> {
//! let server = HttpServer::new(ServerConfig::default());
//! register_routes(&server, UserStore::with_seed_users().into_shared()).await;
//! server.start().await
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Export the store module
pub mod store;

// Export the API module
pub mod api;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, parse_request};
pub use server::{Error as ServerError, HttpResponse, HttpServer, ServerConfig, StatusCode};
pub use store::{DatabaseConfig, Error as StoreError, SharedUserStore, User, UserStore};
pub use api::{register_routes, ApiError, Envelope, Status};
