//! # ragchat CLI
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ragchat index` | Chunk the corpus, embed every chunk, upsert into Qdrant |
//! | `ragchat ask "<question>"` | Run the query pipeline once and print the reply |
//! | `ragchat serve` | Start the chat HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Preview chunk counts without calling any service
//! ragchat index --dry-run
//!
//! # Wipe and rebuild the collection
//! ragchat index --recreate
//!
//! # Serve on $PORT (default 8000)
//! ragchat --config ./rag.toml serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ragchat::config;
use ragchat::ingest::{self, IndexOptions};
use ragchat::progress::ProgressMode;
use ragchat::query;
use ragchat::server;
use ragchat::services::Services;

/// ragchat — answer questions about a document corpus with retrieval-augmented generation.
///
/// Settings come from an optional TOML file, then `QDRANT_HOST`,
/// `QDRANT_API_KEY`, `GOOGLE_API_KEY`, and `PORT` (a `.env` file is honored).
#[derive(Parser)]
#[command(name = "ragchat", version)]
struct Cli {
    /// Path to a configuration file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vector index from the corpus.
    ///
    /// Creates the collection if it is missing, reads every matching file in
    /// path order, splits the concatenated text into overlapping chunks,
    /// embeds each chunk, and upserts all points in one call.
    Index {
        /// Drop and recreate the collection first.
        #[arg(long)]
        recreate: bool,

        /// Show document and chunk counts without calling any service.
        #[arg(long)]
        dry_run: bool,

        /// Progress output on stderr. Defaults to `human` on a TTY, `off` otherwise.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Answer one question and print the reply.
    Ask {
        question: String,
    },

    /// Start the chat HTTP server.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Index {
            recreate,
            dry_run,
            progress,
        } => {
            if dry_run {
                let plan = ingest::plan_chunks(&cfg)?;
                ingest::print_dry_run(&plan, &cfg.qdrant.collection);
                return Ok(());
            }

            let services = Services::from_config(&cfg)?;
            let reporter = progress
                .unwrap_or_else(ProgressMode::default_for_tty)
                .reporter();
            let summary =
                ingest::run_index(&services, IndexOptions { recreate }, reporter.as_ref()).await?;
            ingest::print_summary(&summary, &cfg.qdrant.collection);
        }
        Commands::Ask { question } => {
            let services = Services::from_config(&cfg)?;
            println!("{}", query::answer(&services, &question).await);
        }
        Commands::Serve => {
            let services = Services::from_config(&cfg)?;
            server::run_server(services).await?;
        }
    }

    Ok(())
}
