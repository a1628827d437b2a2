use anyhow::{bail, Context};
use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::{AppConfig, StorageBackend};
use crate::database::{Collection, PgDocumentStore};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create the document tables and owner indexes")]
    Migrate,
}

pub async fn handle(
    cmd: DbCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => {
            if config.storage.backend != StorageBackend::Postgres {
                bail!("db migrate requires STORAGE_BACKEND=postgres");
            }

            let store = PgDocumentStore::connect(&config.storage)
                .await
                .context("failed to connect to Postgres")?;
            store.migrate().await.context("migration failed")?;
            store.close().await;

            let tables: Vec<&str> = Collection::ALL.iter().map(|c| c.table_name()).collect();
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "migrated": tables }))?);
                }
                OutputFormat::Text => println!("Migrated tables: {}", tables.join(", ")),
            }

            Ok(())
        }
    }
}
