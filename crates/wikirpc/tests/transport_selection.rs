//! Transport path selection tests.
//!
//! A stub factory records which path the client chose and answers calls
//! from memory, so no sockets are involved.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wikirpc::codec::{MethodCall, MethodResponse};
use wikirpc::transport::{Transport, TransportConfig, TransportFactory, TransportResponse};
use wikirpc::{ClientOptions, Error, Security, Value, WikiApi, WikiRpcClient, params};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Path {
    Plain,
    Secure,
}

#[derive(Debug)]
struct Built {
    path: Path,
    config: TransportConfig,
}

#[derive(Default)]
struct StubFactory {
    built: Mutex<Vec<Built>>,
    posted: Arc<Mutex<Vec<String>>>,
}

impl StubFactory {
    fn make(&self, path: Path, config: TransportConfig) -> Arc<dyn Transport> {
        self.built.lock().unwrap().push(Built { path, config });
        Arc::new(StubTransport {
            posted: Arc::clone(&self.posted),
        })
    }

    fn paths(&self) -> Vec<Path> {
        self.built.lock().unwrap().iter().map(|b| b.path).collect()
    }
}

impl TransportFactory for StubFactory {
    fn plain(&self, config: TransportConfig) -> Result<Arc<dyn Transport>, Error> {
        Ok(self.make(Path::Plain, config))
    }

    fn secure(&self, config: TransportConfig) -> Result<Arc<dyn Transport>, Error> {
        Ok(self.make(Path::Secure, config))
    }
}

/// Echoes the method name back as a string.
#[derive(Debug)]
struct StubTransport {
    posted: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Transport for StubTransport {
    async fn post(&self, body: String) -> Result<TransportResponse, Error> {
        let call = MethodCall::decode(&body)?;
        self.posted.lock().unwrap().push(body);
        Ok(TransportResponse {
            status: 200,
            body: MethodResponse::Success(Value::String(call.name)).encode(),
        })
    }
}

#[test]
fn https_selects_secure_path() {
    let factory = StubFactory::default();
    let client = WikiRpcClient::with_factory(
        "https://wiki.example.org/lib/exe/xmlrpc.php",
        ClientOptions::new(),
        &factory,
    )
    .unwrap();

    assert_eq!(factory.paths(), vec![Path::Secure]);
    assert_eq!(client.endpoint().security(), Security::Secure);

    let built = factory.built.lock().unwrap();
    let endpoint = &built[0].config.endpoint;
    assert_eq!(endpoint.host(), "wiki.example.org");
    assert_eq!(endpoint.port(), 443);
    assert_eq!(endpoint.as_url().path(), "/lib/exe/xmlrpc.php");
}

#[test]
fn other_schemes_select_plain_path() {
    for url in [
        "http://wiki.example.org:8080/lib/exe/xmlrpc.php",
        "HTTP://localhost/rpc",
        "xmlrpc://wiki.internal/rpc",
    ] {
        let factory = StubFactory::default();
        WikiRpcClient::with_factory(url, ClientOptions::new(), &factory).unwrap();
        assert_eq!(factory.paths(), vec![Path::Plain], "for {url}");
    }
}

#[test]
fn factory_receives_port_and_credentials() {
    let factory = StubFactory::default();
    WikiRpcClient::with_factory(
        "http://wiki.example.org:8080/rpc",
        ClientOptions::new().basic_auth("a", "b"),
        &factory,
    )
    .unwrap();

    let built = factory.built.lock().unwrap();
    let config = &built[0].config;
    assert_eq!(config.endpoint.port(), 8080);
    assert_eq!(
        config.authorization.as_ref().unwrap().to_str().unwrap(),
        "Basic YTpi"
    );
    assert!(!config.cookies);
    assert!(config.timeout.is_none());
}

#[test]
fn bad_url_never_reaches_factory() {
    let factory = StubFactory::default();
    let err = WikiRpcClient::with_factory("wiki.example.org", ClientOptions::new(), &factory)
        .unwrap_err();

    assert!(matches!(err, Error::Configuration(_)));
    assert!(factory.paths().is_empty());
}

#[tokio::test]
async fn calls_go_through_the_built_transport() {
    let factory = StubFactory::default();
    let client =
        WikiRpcClient::with_factory("https://wiki.example.org/rpc", ClientOptions::new(), &factory)
            .unwrap();

    let name: String = client.call("wiki.getPage", params!["Start"]).await.unwrap();
    assert_eq!(name, "wiki.getPage");

    let text = client.get_page_html("Start").await.unwrap();
    assert_eq!(text, "wiki.getPageHTML");

    let posted = factory.posted.lock().unwrap();
    assert_eq!(posted.len(), 2);
    assert!(posted[0].contains("<string>Start</string>"));
}
