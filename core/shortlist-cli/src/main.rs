//! shortlist: command-line surface for the Shortlist comparison list.
//!
//! Each invocation builds its own engine over `~/.shortlist` (or
//! `SHORTLIST_HOME`), the way a popup or background context would, so two
//! concurrent invocations behave like two extension contexts.
//!
//! ## Subcommands
//!
//! - `add`: Add or reactivate an item (flags, or JSON from a file / stdin)
//! - `remove`: Tombstone an item, notifying the service if a session exists
//! - `list`: Print active items (`--all` includes tombstones)
//! - `refresh`: Merge the service's list into the local one
//! - `compare`: Submit the active items and print the comparison link
//! - `badge`: Print the badge projection
//! - `identity`: Print the browser identity used as the session id

mod commands;
mod logging;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use shortlist_core::{ShortlistEngine, StorageConfig};

use crate::commands::{CandidateSource, CliResult};

#[derive(Parser)]
#[command(name = "shortlist")]
#[command(about = "Collect products and compare them side by side")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item, update it if present, or reactivate it if removed
    Add(AddArgs),

    /// Remove an item (kept as a tombstone)
    Remove {
        #[arg(value_name = "PRODUCT_ID")]
        product_id: String,
    },

    /// Print the comparison list
    List {
        /// Include removed items
        #[arg(long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Pull the list stored by the comparison service and merge it
    Refresh,

    /// Create a comparison session and print its link
    Compare,

    /// Print the active-count badge
    Badge,

    /// Print the browser identity
    Identity,
}

#[derive(Args)]
struct AddArgs {
    /// Read the item as JSON from PATH, or stdin for `-`
    #[arg(long, value_name = "PATH", conflicts_with_all = ["id", "title", "price", "image", "retailer"])]
    json: Option<String>,

    #[arg(long)]
    id: Option<String>,

    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    price: String,

    #[arg(long, default_value = "")]
    image: String,

    #[arg(long, default_value = "")]
    retailer: String,

    /// Id to use when the item carries none (typically the page URL)
    #[arg(long, value_name = "ID")]
    fallback_id: Option<String>,
}

impl AddArgs {
    fn source(&self) -> CandidateSource {
        match &self.json {
            Some(path) => CandidateSource::Json(path.clone()),
            None => CandidateSource::Fields {
                id: self.id.clone(),
                title: self.title.clone(),
                price: self.price.clone(),
                image: self.image.clone(),
                retailer: self.retailer.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let storage = StorageConfig::default();
    let _logging_guard = logging::init(&storage);

    // Return instead of exiting so the guard flushes the log file.
    match run(cli.command, storage).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "shortlist command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, storage: StorageConfig) -> CliResult<()> {
    let engine = ShortlistEngine::with_storage(storage)?;

    match command {
        Commands::Add(args) => {
            commands::add(&engine, args.source(), args.fallback_id.as_deref()).await
        }
        Commands::Remove { product_id } => commands::remove(&engine, &product_id).await,
        Commands::List { all, json } => commands::list(&engine, all, json).await,
        Commands::Refresh => commands::refresh(&engine).await,
        Commands::Compare => commands::compare(&engine).await,
        Commands::Badge => commands::badge(&engine).await,
        Commands::Identity => commands::identity(&engine).await,
    }
}
