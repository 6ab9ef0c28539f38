//! CLI tests against a mock XML-RPC endpoint.

mod common;

use common::{RPC_PATH, run_cli_failure, run_cli_success, xml_ok};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer};

async fn mock(server: &MockServer, name: &str, response: wiremock::ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_string_contains(format!("<methodName>{name}</methodName>")))
        .respond_with(response)
        .mount(server)
        .await;
}

fn url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), RPC_PATH)
}

#[tokio::test]
async fn test_call_prints_json_result() {
    let server = MockServer::start().await;
    mock(&server, "wiki.getPage", xml_ok("====== Start ======")).await;
    let home = tempfile::tempdir().unwrap();

    let stdout = run_cli_success(
        &["call", "wiki.getPage", "start", "--url", &url(&server)],
        home.path(),
    )
    .await;

    assert_eq!(stdout.trim(), "\"====== Start ======\"");
    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("<string>start</string>"));
}

#[tokio::test]
async fn test_call_sends_numbers_as_ints() {
    let server = MockServer::start().await;
    mock(&server, "wiki.getPageVersion", xml_ok("old text")).await;
    let home = tempfile::tempdir().unwrap();

    run_cli_success(
        &[
            "call",
            "wiki.getPageVersion",
            "start",
            "1700000000",
            "--url",
            &url(&server),
        ],
        home.path(),
    )
    .await;

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("<int>1700000000</int>"));
}

#[tokio::test]
async fn test_fault_is_reported() {
    let server = MockServer::start().await;
    mock(
        &server,
        "wiki.getPage",
        wiremock::ResponseTemplate::new(200).set_body_string(
            wikirpc::codec::MethodResponse::Fault(wikirpc::ProtocolError::new(
                111,
                "Page does not exist",
            ))
            .encode(),
        ),
    )
    .await;
    let home = tempfile::tempdir().unwrap();

    let stderr = run_cli_failure(
        &["page", "get", "nope", "--url", &url(&server)],
        home.path(),
    )
    .await;

    assert!(stderr.contains("fault 111"));
    assert!(stderr.contains("Page does not exist"));
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(xml_ok("My Wiki"))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let stdout = run_cli_success(
        &[
            "call",
            "dokuwiki.getTitle",
            "--url",
            &url(&server),
            "--user",
            "a",
            "--password",
            "b",
            "--token",
            "tok",
        ],
        home.path(),
    )
    .await;

    assert_eq!(stdout.trim(), "\"My Wiki\"");
}

#[tokio::test]
async fn test_missing_url_is_an_error() {
    let home = tempfile::tempdir().unwrap();

    let stderr = run_cli_failure(&["call", "dokuwiki.getTitle"], home.path()).await;

    assert!(stderr.contains("No endpoint configured"));
}

#[tokio::test]
async fn test_methods_lists_catalogue() {
    let home = tempfile::tempdir().unwrap();

    let stdout = run_cli_success(&["methods"], home.path()).await;
    assert!(stdout.contains("wiki.getPage"));
    assert!(stdout.contains("dokuwiki.setLocks"));
    assert!(stdout.contains("plugin.struct.saveData"));

    let stdout = run_cli_success(&["methods", "--namespace", "dokuwiki"], home.path()).await;
    assert!(stdout.contains("dokuwiki.login"));
    assert!(!stdout.contains("wiki.getPage\n"));
}

#[tokio::test]
async fn test_profile_is_used_for_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Basic YTpi"))
        .and(body_string_contains("dokuwiki.getVersion"))
        .respond_with(xml_ok("Release 2024-02-06"))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let stdout = run_cli_success(
        &[
            "profile",
            "save",
            "--url",
            &url(&server),
            "--user",
            "a",
            "--password",
            "b",
        ],
        home.path(),
    )
    .await;
    assert!(stdout.contains("Profile saved"));

    let stdout = run_cli_success(&["profile", "show"], home.path()).await;
    assert!(stdout.contains(&url(&server)));
    assert!(stdout.contains("basic"));
    assert!(!stdout.contains("\"b\""));

    let stdout = run_cli_success(&["call", "dokuwiki.getVersion"], home.path()).await;
    assert_eq!(stdout.trim(), "\"Release 2024-02-06\"");

    let stdout = run_cli_success(&["profile", "clear"], home.path()).await;
    assert!(stdout.contains("Profile removed"));

    let stderr = run_cli_failure(&["call", "dokuwiki.getVersion"], home.path()).await;
    assert!(stderr.contains("No endpoint configured"));
}

#[tokio::test]
async fn test_search_prints_ids_and_snippets() {
    let server = MockServer::start().await;
    let hit = wikirpc::Value::structure([
        ("id", wikirpc::Value::from("wiki:syntax")),
        ("score", wikirpc::Value::from(3)),
        ("snippet", wikirpc::Value::from("formatting <strong>syntax</strong>")),
    ]);
    mock(&server, "dokuwiki.search", xml_ok(vec![hit])).await;
    let home = tempfile::tempdir().unwrap();

    let stdout = run_cli_success(
        &["search", "syntax", "--url", &url(&server)],
        home.path(),
    )
    .await;

    assert!(stdout.contains("wiki:syntax"));
    assert!(stdout.contains("formatting"));
}
