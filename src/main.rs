//! `users-api` server binary.

mod cli;

use clap::Parser;
use log::info;

use users_api::{register_routes, HttpServer, UserStore};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // The store lives in memory; the database settings are only reported
    let database = cli.database_config();
    info!("Database configuration: {database}");
    info!("Database DSN: {dsn}", dsn = database.redacted_dsn());
    info!("Using in-memory user store");

    let store = UserStore::with_seed_users();
    info!("Loaded {count} seed users", count = store.len());

    let server = HttpServer::new(cli.server_config());
    register_routes(&server, store.into_shared()).await;

    server.start().await?;

    Ok(())
}
