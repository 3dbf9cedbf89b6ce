#![allow(clippy::exit)] // the sql-error policy below is log-and-terminate

use charkeeper::dispatch::{Manager, SQL_ERROR_EVENT};
use charkeeper::errors::{Error, Result};
use charkeeper::{bot, commands, config, db};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_config(config::DEFAULT_CONFIG_PATH)
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;
    info!("Successfully processed application configuration.");

    // 4. Set up the dispatch manager
    let manager = Arc::new(Manager::new());
    manager.set_prefix(app_config.prefix.clone());

    // Example escalation policy: any connection-level database failure ends
    // the process. The core only publishes the event; exiting is our call.
    manager.on(SQL_ERROR_EVENT, |event| {
        error!(?event, "database failure, shutting down");
        std::process::exit(1);
    });

    // 5. Connect to the database and ensure the schema exists
    manager
        .connect(&app_config.database.token())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    if let Some(db) = manager.connection() {
        db::create_tables(&db)
            .await
            .inspect(|()| info!("Database schema ensured."))
            .inspect_err(|e| error!("Failed to create tables: {e}"))?;
    }

    // 6. Register the built-in commands
    manager.register_all(commands::all());

    // 7. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::clone(&manager)).await?;

    Ok(())
}
