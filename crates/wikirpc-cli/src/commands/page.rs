//! Page subcommands.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::json;

use wikirpc::{DokuwikiApi, PageAttrs, Value, WikiApi, WikiRpcClient};

use crate::cli::ConnectionArgs;
use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct PageCommand {
    #[command(subcommand)]
    pub command: PageSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PageSubcommand {
    /// Print the raw wiki text of a page
    Get {
        page: String,
        /// Revision timestamp
        #[arg(long)]
        at: Option<i64>,
    },

    /// Print the rendered XHTML of a page
    Html {
        page: String,
        /// Revision timestamp
        #[arg(long)]
        rev: Option<i64>,
    },

    /// Show page metadata
    Info {
        page: String,
        /// Revision timestamp
        #[arg(long)]
        rev: Option<i64>,
    },

    /// Replace the page text
    Put(WriteArgs),

    /// Append text to a page
    Append(WriteArgs),

    /// Links contained in a page
    Links { page: String },

    /// Pages linking to a page
    Backlinks { page: String },

    /// List the pages of a namespace
    List {
        /// Namespace, empty for the root
        #[arg(default_value = "")]
        namespace: String,
        /// Maximum recursion depth
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Show the revision history of a page
    Versions {
        page: String,
        /// Skip this many of the newest entries
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    pub page: String,

    /// Read the text from a file instead of stdin
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Change summary
    #[arg(long, short)]
    pub summary: Option<String>,

    /// Mark as minor edit
    #[arg(long)]
    pub minor: bool,
}

impl WriteArgs {
    fn attrs(&self) -> PageAttrs {
        PageAttrs {
            sum: self.summary.clone(),
            minor: self.minor.then_some(true),
        }
    }

    fn text(&self) -> Result<String> {
        match &self.file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read stdin")?;
                Ok(text)
            }
        }
    }
}

pub async fn handle(conn: &ConnectionArgs, cmd: PageCommand) -> Result<()> {
    let client = config::connect(conn)?;

    match cmd.command {
        PageSubcommand::Get { page, at } => {
            let text = client
                .get_page(&page, at)
                .await
                .with_context(|| format!("Failed to get {page}"))?;
            print!("{text}");
        }
        PageSubcommand::Html { page, rev } => {
            let html = match rev {
                Some(rev) => client.get_page_html_version(&page, rev).await,
                None => client.get_page_html(&page).await,
            }
            .with_context(|| format!("Failed to render {page}"))?;
            print!("{html}");
        }
        PageSubcommand::Info { page, rev } => {
            let info = match rev {
                Some(rev) => client.get_page_info_version(&page, rev).await,
                None => client.get_page_info(&page).await,
            }
            .with_context(|| format!("Failed to get info for {page}"))?;

            output::field("Name", output::or_dash(info.name));
            output::field("Modified", output::or_dash(info.last_modified));
            output::field("Author", output::or_dash(info.author));
            output::field("Version", output::or_dash(info.version));
        }
        PageSubcommand::Put(args) => write(&client, args, false).await?,
        PageSubcommand::Append(args) => write(&client, args, true).await?,
        PageSubcommand::Links { page } => {
            let links = client
                .list_links(&page)
                .await
                .with_context(|| format!("Failed to list links of {page}"))?;
            for link in &links {
                let kind = link.kind.as_deref().unwrap_or("?");
                let target = link.page.as_deref().or(link.href.as_deref()).unwrap_or("?");
                println!("{}  {target}", format!("{kind:>5}").dimmed());
            }
        }
        PageSubcommand::Backlinks { page } => {
            let pages = client
                .get_back_links(&page)
                .await
                .with_context(|| format!("Failed to get backlinks of {page}"))?;
            for page in &pages {
                println!("{page}");
            }
        }
        PageSubcommand::List { namespace, depth } => {
            // Passed through to the server's search options verbatim
            let options = depth
                .map(|depth| Value::from_json(json!({ "depth": depth })))
                .transpose()?;
            let pages = client
                .get_pagelist(&namespace, options)
                .await
                .context("Failed to list pages")?;
            for item in &pages {
                println!("{}", item.id.as_deref().unwrap_or("?"));
            }
        }
        PageSubcommand::Versions { page, offset } => {
            let versions = client
                .get_page_versions(&page, offset)
                .await
                .with_context(|| format!("Failed to get history of {page}"))?;
            output::json(&versions)?;
        }
    }

    Ok(())
}

async fn write(client: &WikiRpcClient, args: WriteArgs, append: bool) -> Result<()> {
    let text = args.text()?;
    if text.is_empty() && append {
        bail!("Nothing to append");
    }

    let attrs = args.attrs();
    let saved = if append {
        client.append_page(&args.page, &text, &attrs).await
    } else {
        client.put_page(&args.page, &text, &attrs).await
    }
    .with_context(|| format!("Failed to save {}", args.page))?;

    if !saved {
        bail!("The server did not save {}", args.page);
    }

    output::success(format!("Saved {}", args.page));
    Ok(())
}
