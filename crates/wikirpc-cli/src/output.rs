//! Terminal output.
//!
//! Command results go to stdout; notices and errors go to stderr so results
//! stay pipeable.

use std::fmt::Display;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Width labels are padded to in [`field`] listings.
const LABEL_WIDTH: usize = 12;

pub fn success(msg: impl Display) {
    println!("{} {msg}", "ok".green().bold());
}

/// Print an error with its whole context chain.
pub fn failure(err: &anyhow::Error) {
    eprintln!("{} {err:#}", "error:".red().bold());
}

/// Print an informational line that is not part of the result.
pub fn notice(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print one `label  value` line of a listing.
pub fn field(label: &str, value: impl Display) {
    let label = format!("{label:<LABEL_WIDTH$}");
    println!("{} {value}", label.dimmed());
}

/// Display a value the server may leave out.
pub fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
