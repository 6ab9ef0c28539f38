//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::call::CallArgs;
use crate::commands::methods::MethodsArgs;
use crate::commands::page::PageCommand;
use crate::commands::profile::ProfileCommand;
use crate::commands::recent::RecentArgs;
use crate::commands::search::SearchArgs;

/// Explore DokuWiki / WikiRPC2 XML-RPC endpoints.
#[derive(Parser, Debug)]
#[command(name = "wikirpc")]
#[command(author, version = env!("WIKIRPC_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where and how to connect. Unset values fall back to the saved profile.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// XML-RPC endpoint, e.g. https://wiki.example.org/lib/exe/xmlrpc.php
    #[arg(long, env = "WIKIRPC_URL", global = true)]
    pub url: Option<String>,

    /// User for HTTP Basic authentication
    #[arg(long, env = "WIKIRPC_USER", global = true)]
    pub user: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(long, env = "WIKIRPC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Bearer token; takes precedence over --user/--password
    #[arg(long, env = "WIKIRPC_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Keep cookies between the calls of one command
    #[arg(long, global = true)]
    pub cookies: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call any remote method by name
    Call(CallArgs),

    /// List the known remote methods
    Methods(MethodsArgs),

    /// Show wiki title, versions and server time
    Version,

    /// Page operations
    Page(PageCommand),

    /// Fulltext search
    Search(SearchArgs),

    /// Recently changed pages
    Recent(RecentArgs),

    /// Manage the saved connection profile
    Profile(ProfileCommand),
}
