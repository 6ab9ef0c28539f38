//! wikirpc - CLI tool for DokuWiki XML-RPC endpoints.
//!
//! This is a thin wrapper over the `wikirpc` library, intended for manual
//! exploration of a wiki's remote API.

mod cli;
mod commands;
mod config;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{call, methods, page, profile, recent, search, version};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Call(args) => call::run(&cli.connection, args).await,
        Commands::Methods(args) => methods::run(args),
        Commands::Version => version::run(&cli.connection).await,
        Commands::Page(cmd) => page::handle(&cli.connection, cmd).await,
        Commands::Search(args) => search::run(&cli.connection, args).await,
        Commands::Recent(args) => recent::run(&cli.connection, args).await,
        Commands::Profile(cmd) => profile::handle(&cli.connection, cmd),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info,wikirpc=debug",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output stays pipeable
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
