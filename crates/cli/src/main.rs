use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

const DEFAULT_DB: &str = "./data/db.json";

#[derive(Parser)]
#[command(name = "paragon")]
#[command(about = "Receipt ledger: ingest receipts, track product prices, review spending")]
#[command(version)]
struct Cli {
    /// Path to the JSON database (env: PARAGON_DB)
    #[arg(long, global = true, env = "PARAGON_DB", default_value = DEFAULT_DB)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a raw extraction payload from a JSON file (or stdin with "-")
    Ingest {
        /// JSON file with the extracted receipt
        input: PathBuf,
    },
    /// Extract a receipt from an image via the vision service, then ingest it
    Scan {
        /// Image (or PDF) file to analyze
        input: PathBuf,
        /// MIME type of the file; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
        /// Print the extracted payload without saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored receipts, newest first
    List,
    /// Print one receipt as JSON
    Show { id: String },
    /// Delete a receipt and rebuild the product table
    Delete { id: String },
    /// List tracked products with their latest prices
    Products,
    /// Print spending statistics as JSON
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let service = commands::open_service(&cli.db);

    match cli.command {
        Commands::Ingest { input } => commands::ingest(&service, &input),
        Commands::Scan { input, mime, dry_run } => {
            commands::scan(&service, &input, mime.as_deref(), dry_run).await
        }
        Commands::List => commands::list(&service),
        Commands::Show { id } => commands::show(&service, &id),
        Commands::Delete { id } => commands::delete(&service, &id),
        Commands::Products => commands::products(&service),
        Commands::Stats => commands::stats(&service),
    }
}
