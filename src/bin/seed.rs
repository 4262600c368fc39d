//! Load inventory seeding tool.
//!
//! Seeds the demo catalog into the configured database, or imports loads
//! from a CSV export.

use anyhow::{Context, Result};
use carrier_sales::db::{
    init_db, read_loads_csv, seed_loads_append_missing, seed_loads_if_empty, Repository,
};
use clap::{Parser, ValueEnum};
use std::fs::File;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Seed or import freight loads", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH")]
    database: String,

    /// How demo loads are applied
    #[arg(long, value_enum, default_value = "if-empty")]
    mode: SeedMode,

    /// Import loads from a CSV file instead of the demo catalog
    #[arg(long)]
    csv: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SeedMode {
    /// Insert the demo catalog only when no loads exist
    IfEmpty,
    /// Insert demo loads whose ids are missing
    Append,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let pool = init_db(&cli.database)
        .await
        .with_context(|| format!("failed to open database {}", cli.database))?;
    let repo = Repository::new(pool);

    if let Some(path) = cli.csv {
        let file = File::open(&path).with_context(|| format!("failed to open {}", path))?;
        let loads = read_loads_csv(file)?;
        let written = repo.upsert_loads(&loads).await?;
        info!(path = %path, written, "Imported loads from CSV");
        return Ok(());
    }

    let now = chrono::Utc::now();
    let inserted = match cli.mode {
        SeedMode::IfEmpty => seed_loads_if_empty(&repo, now).await?,
        SeedMode::Append => seed_loads_append_missing(&repo, now).await?,
    };
    info!(inserted, total = repo.count_loads().await?, "Seeded loads");

    Ok(())
}
