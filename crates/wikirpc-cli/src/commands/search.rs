//! Fulltext search.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use wikirpc::DokuwikiApi;

use crate::cli::ConnectionArgs;
use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Print the raw results as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(conn: &ConnectionArgs, args: SearchArgs) -> Result<()> {
    let client = config::connect(conn)?;

    let hits = client
        .search(&args.query)
        .await
        .context("Search failed")?;

    if args.json {
        return output::json(&hits);
    }

    if hits.is_empty() {
        output::notice("No matches.");
        return Ok(());
    }

    for hit in &hits {
        let id = hit.id.as_deref().unwrap_or("?");
        match hit.score {
            Some(score) => println!("{} {}", id.bold(), format!("({score})").dimmed()),
            None => println!("{}", id.bold()),
        }
        if let Some(snippet) = hit.snippet.as_deref().filter(|s| !s.is_empty()) {
            println!("  {}", snippet.trim());
        }
    }

    Ok(())
}
