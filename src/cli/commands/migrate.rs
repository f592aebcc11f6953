use anyhow::Context;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    let pool = DatabaseManager::connect(config).context("failed to create database pool")?;

    DatabaseManager::migrate(&pool)
        .await
        .context("failed to apply migrations")?;
    pool.close().await;

    let target = config.redacted_database_url().unwrap_or_default();
    match output_format {
        OutputFormat::Json => println!("{}", json!({ "migrated": true, "database": target })),
        OutputFormat::Text => println!("Migrations applied to {}", target),
    }
    Ok(())
}
