//! Listener and per-connection limits.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Settings for [`HttpServer`](crate::server::HttpServer).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Connections served at once. Further connections get a 503.
    pub max_connections: usize,
    /// Bytes read for a single request, head and body together.
    pub read_buffer_size: usize,
    /// How long a client may take to send a complete request before it is
    /// answered with a 408.
    pub read_timeout: Duration,
    /// How long shutdown waits for in-flight connections before aborting them.
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            max_connections: 1024,
            read_buffer_size: 8192,
            read_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}
