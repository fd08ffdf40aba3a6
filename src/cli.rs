//! Command-line arguments.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use users_api::{DatabaseConfig, ServerConfig};

/// CRUD HTTP API for user records.
#[derive(Parser, Debug)]
#[command(name = "users-api", version, about)]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "USERS_API_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Maximum number of concurrent connections.
    #[arg(long, env = "USERS_API_MAX_CONNECTIONS", default_value_t = 1024)]
    pub max_connections: usize,

    /// Maximum size of a single request in bytes.
    #[arg(long, env = "USERS_API_READ_BUFFER", default_value_t = 8192)]
    pub read_buffer_size: usize,

    /// Seconds a client may take to send its request.
    #[arg(long, env = "USERS_API_READ_TIMEOUT", default_value_t = 30)]
    pub read_timeout_secs: u64,

    /// Seconds to wait for open connections when shutting down.
    #[arg(long, env = "USERS_API_SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout_secs: u64,

    /// Database host.
    #[arg(long, env = "USERS_DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port.
    #[arg(long, env = "USERS_DB_PORT", default_value_t = 3306)]
    pub db_port: u16,

    /// Database user.
    #[arg(long, env = "USERS_DB_USER", default_value = "root")]
    pub db_user: String,

    /// Database password.
    #[arg(long, env = "USERS_DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name.
    #[arg(long, env = "USERS_DB_NAME", default_value = "users_db")]
    pub db_name: String,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            addr: self.listen,
            max_connections: self.max_connections,
            read_buffer_size: self.read_buffer_size,
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            shutdown_timeout: Duration::from_secs(self.shutdown_timeout_secs),
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            username: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
        }
    }
}
