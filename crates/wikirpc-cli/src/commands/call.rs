//! Call any remote method by name.

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use wikirpc::Value;

use crate::cli::ConnectionArgs;
use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Remote method name (e.g., wiki.getPage)
    pub method: String,

    /// Parameters; each is parsed as JSON and falls back to a plain string
    pub params: Vec<String>,
}

pub async fn run(conn: &ConnectionArgs, args: CallArgs) -> Result<()> {
    let params = args
        .params
        .iter()
        .map(|raw| parse_param(raw))
        .collect::<Result<Vec<_>>>()?;

    let client = config::connect(conn)?;
    debug!(method = %args.method, params = params.len(), "calling");

    let result: serde_json::Value = client
        .call(&args.method, params)
        .await
        .with_context(|| format!("{} failed", args.method))?;

    output::json(&result)
}

/// `start` is a string, `42` an int, `{"sum":"x"}` a struct.
fn parse_param(raw: &str) -> Result<Value> {
    let json = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Value::from_json(json).with_context(|| format!("Unsupported parameter: {raw}"))
}
