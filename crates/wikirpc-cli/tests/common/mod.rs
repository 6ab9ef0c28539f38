use std::path::Path;
use std::process::Output;

use tokio::process::Command;
use wikirpc::Value;
use wikirpc::codec::MethodResponse;
use wiremock::ResponseTemplate;

pub const RPC_PATH: &str = "/lib/exe/xmlrpc.php";

/// Run the CLI with an isolated HOME so no real profile is read or written.
pub async fn run_cli(args: &[&str], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wikirpc"));
    cmd.args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("NO_COLOR", "1")
        .env_remove("WIKIRPC_URL")
        .env_remove("WIKIRPC_USER")
        .env_remove("WIKIRPC_PASSWORD")
        .env_remove("WIKIRPC_TOKEN")
        .env_remove("RUST_LOG");
    cmd.output().await.expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_cli_success(args: &[&str], home: &Path) -> String {
    let output = run_cli(args, home).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_cli_failure(args: &[&str], home: &Path) -> String {
    let output = run_cli(args, home).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn xml_ok(value: impl Into<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/xml")
        .set_body_string(MethodResponse::Success(value.into()).encode())
}
