//! Command handlers. Each runs against one engine and prints to stdout.

use std::io::Read;

use serde_json::Map;
use shortlist_core::{
    AddOutcome, CandidateItem, ComparisonItem, RefreshOutcome, RemoveOutcome, ShortlistEngine,
    ShortlistError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid item JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Shortlist(#[from] ShortlistError),
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Io(_) => "io_error",
            CliError::Json(_) => "malformed_item",
            CliError::Shortlist(err) => err.code(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// Where the candidate for `add` comes from.
pub enum CandidateSource {
    Fields {
        id: Option<String>,
        title: String,
        price: String,
        image: String,
        retailer: String,
    },
    /// A JSON document at a path, or stdin for `-`.
    Json(String),
}

impl CandidateSource {
    fn read(self) -> CliResult<CandidateItem> {
        match self {
            CandidateSource::Fields {
                id,
                title,
                price,
                image,
                retailer,
            } => Ok(CandidateItem {
                product_id: id,
                title,
                price,
                image,
                retailer,
                extra: Map::new(),
            }),
            CandidateSource::Json(path) => {
                let raw = if path == "-" {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                } else {
                    fs_err::read_to_string(&path)?
                };
                Ok(serde_json::from_str(&raw)?)
            }
        }
    }
}

pub async fn add(
    engine: &ShortlistEngine,
    source: CandidateSource,
    fallback_id: Option<&str>,
) -> CliResult<()> {
    let candidate = source.read()?;
    let outcome = engine.add(candidate, fallback_id).await?;
    let verb = match outcome {
        AddOutcome::Added => "added",
        AddOutcome::Updated => "updated",
        AddOutcome::Reactivated => "reactivated",
    };
    println!("{} ({} active)", verb, engine.get_active().await.len());
    Ok(())
}

pub async fn remove(engine: &ShortlistEngine, product_id: &str) -> CliResult<()> {
    match engine.remove(product_id).await? {
        RemoveOutcome::Removed => println!("removed {}", product_id),
        RemoveOutcome::Unchanged => println!("{} not in list", product_id),
    }
    Ok(())
}

pub async fn list(engine: &ShortlistEngine, all: bool, json: bool) -> CliResult<()> {
    let items = if all {
        engine.reload().await?
    } else {
        engine.get_active().await
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print_items(&items, all);
    }
    Ok(())
}

pub async fn refresh(engine: &ShortlistEngine) -> CliResult<()> {
    match engine.refresh().await? {
        RefreshOutcome::Merged {
            items,
            server_count,
        } => println!(
            "merged {} server item(s), {} total",
            server_count,
            items.len()
        ),
        RefreshOutcome::Degraded { items, reason } => println!(
            "service unreachable ({}), kept {} local item(s)",
            reason,
            items.len()
        ),
    }
    Ok(())
}

pub async fn compare(engine: &ShortlistEngine) -> CliResult<()> {
    let link = engine.create_session().await?;
    println!("{}", link.url);
    Ok(())
}

pub async fn badge(engine: &ShortlistEngine) -> CliResult<()> {
    let badge = engine.badge().await;
    if badge.is_cleared() {
        println!("(cleared)");
    } else {
        println!("{} {}", badge.text, badge.color);
    }
    Ok(())
}

pub async fn identity(engine: &ShortlistEngine) -> CliResult<()> {
    let identity = engine.identity().await?;
    println!("{}", identity.session_id());
    Ok(())
}

fn print_items(items: &[ComparisonItem], with_status: bool) {
    if items.is_empty() {
        println!("(empty)");
        return;
    }
    for item in items {
        if with_status {
            let status = if item.is_active() { "active" } else { "removed" };
            println!(
                "{:<8} {}\t{}\t{}\t{}",
                status, item.product_id, item.title, item.price, item.retailer
            );
        } else {
            println!(
                "{}\t{}\t{}\t{}",
                item.product_id, item.title, item.price, item.retailer
            );
        }
    }
}
