//! Recently changed pages.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Args;
use colored::Colorize;

use wikirpc::WikiApi;

use crate::cli::ConnectionArgs;
use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct RecentArgs {
    /// Unix timestamp to list changes since (defaults to 24 hours ago)
    #[arg(long)]
    pub since: Option<i64>,

    /// Print the raw results as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(conn: &ConnectionArgs, args: RecentArgs) -> Result<()> {
    let since = args
        .since
        .unwrap_or_else(|| (Utc::now() - Duration::days(1)).timestamp());

    let client = config::connect(conn)?;
    let changes = client
        .get_recent_changes(since)
        .await
        .context("Failed to get recent changes")?;

    if args.json {
        return output::json(&changes);
    }

    if changes.is_empty() {
        output::notice("No changes.");
        return Ok(());
    }

    for change in &changes {
        let modified = output::or_dash(change.last_modified.as_ref());
        println!(
            "{}  {}  {}",
            modified.dimmed(),
            change.name.as_deref().unwrap_or("?").bold(),
            change.author.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}
