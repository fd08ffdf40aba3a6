//! Database connection settings.
//!
//! The store is purely in-memory; these settings are accepted at startup and
//! reported in the logs so a deployment can be configured the same way it
//! would be against a real MySQL server.

use std::fmt;

/// MySQL-style connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            username: "root".to_string(),
            password: String::new(),
            database: "users_db".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// The data source name for a MySQL driver.
    pub fn dsn(&self) -> String {
        format!(
            "{user}:{password}@tcp({host}:{port})/{database}?charset=utf8mb4&parseTime=True",
            user = self.username,
            password = self.password,
            host = self.host,
            port = self.port,
            database = self.database,
        )
    }

    /// The data source name with the password masked, safe to log.
    pub fn redacted_dsn(&self) -> String {
        Self {
            password: mask(&self.password),
            ..self.clone()
        }
        .dsn()
    }
}

fn mask(password: &str) -> String {
    if password.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}

impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{user}@{host}:{port}/{database} (password: {password})",
            user = self.username,
            host = self.host,
            port = self.port,
            database = self.database,
            password = if self.password.is_empty() { "none" } else { "set" },
        )
    }
}
