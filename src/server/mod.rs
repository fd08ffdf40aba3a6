//! HTTP server.
//!
//! An async, tokio-based server that reads one request per connection,
//! dispatches it through a table of pattern routes, and writes the handler's
//! response back.

mod response;
mod config;
mod error;
mod handler;
mod http_server;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use handler::{HandlerFn, HandlerFuture, Route};
pub use http_server::HttpServer;
