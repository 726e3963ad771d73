// Binary entry point - import modules directly
mod cli;
mod config;
mod core;
mod manager;
mod storage;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use config::Config;
use crate::core::operations::SqlRecordStore;
use utils::{OutputStyle, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let config_path = cli.config.clone().unwrap_or_else(Config::config_file_path);
    let config = Config::load(&config_path, &cli.section)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    if !config.app.color {
        colored::control::set_override(false);
    }
    let table = cli.table.unwrap_or(config.app.table);

    println!("{}", OutputStyle::info("Connecting to database..."));
    let conn = storage::connect(&config.connection).await?;
    let mut store = SqlRecordStore::new(conn, table);

    // Close the connection on every path, then surface the command's error
    let result = cli.command.unwrap_or(Commands::Menu).execute(&mut store).await;
    let closed = store.close().await;
    result?;
    closed?;

    Ok(())
}
