//! Show wiki title, versions and server time.

use anyhow::{Context, Result};
use chrono::DateTime;

use wikirpc::{DokuwikiApi, WikiApi};

use crate::cli::ConnectionArgs;
use crate::config;
use crate::output;

pub async fn run(conn: &ConnectionArgs) -> Result<()> {
    let client = config::connect(conn)?;

    let (title, version, api_version, rpc_version, time) = tokio::join!(
        client.get_title(),
        client.get_version(),
        client.get_xmlrpc_api_version(),
        client.get_rpc_version_supported(),
        client.get_time(),
    );

    output::field("Endpoint", client.endpoint().as_str());
    output::field("Title", title.context("Failed to get title")?);
    output::field("Version", version.context("Failed to get version")?);
    output::field(
        "XML-RPC API",
        api_version.context("Failed to get API version")?,
    );
    // Older servers do not implement wiki.getRPCVersionSupported
    output::field(
        "RPC version",
        output::or_dash(rpc_version.ok().map(|v| v.into_json())),
    );

    let time = time.context("Failed to get server time")?;
    output::field("Server time", output::or_dash(DateTime::from_timestamp(time, 0)));

    Ok(())
}
