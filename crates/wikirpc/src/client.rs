//! XML-RPC client bound to one endpoint.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use crate::auth::{Auth, BasicAuth};
use crate::codec::{MethodCall, MethodResponse};
use crate::endpoint::{Endpoint, Security};
use crate::error::{Error, TransportError};
use crate::proxy::Proxy;
use crate::transport::{
    HttpTransportFactory, Transport, TransportConfig, TransportFactory, USER_AGENT,
};
use crate::value::Value;

/// Options recognised by [`WikiRpcClient::new`].
///
/// `basic_auth` and `bearer_auth` are alternatives. If both are set the
/// bearer token is used and the basic credentials are ignored.
#[derive(Clone, Default)]
pub struct ClientOptions {
    pub basic_auth: Option<BasicAuth>,
    pub bearer_auth: Option<String>,
    /// Keep server cookies between calls, e.g. after `dokuwiki.login`.
    pub cookies: bool,
    /// Deadline enforced by the HTTP client. Unset by default.
    pub timeout: Option<Duration>,
    /// Overrides the default `wikirpc/<version>` User-Agent.
    pub user_agent: Option<String>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn basic_auth(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth::new(user, pass));
        self
    }

    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.bearer_auth = Some(token.into());
        self
    }

    /// Replace both credential fields with a single resolved form.
    pub fn auth(mut self, auth: Auth) -> Self {
        (self.basic_auth, self.bearer_auth) = match auth {
            Auth::None => (None, None),
            Auth::Basic(basic) => (Some(basic), None),
            Auth::Bearer(token) => (None, Some(token)),
        };
        self
    }

    pub fn cookies(mut self, enabled: bool) -> Self {
        self.cookies = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The credential form these options resolve to.
    pub fn resolved_auth(&self) -> Auth {
        Auth::resolve(self.basic_auth.clone(), self.bearer_auth.clone())
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("basic_auth", &self.basic_auth)
            .field("bearer_auth", &self.bearer_auth.as_ref().map(|_| "[REDACTED]"))
            .field("cookies", &self.cookies)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Anything that can perform a remote call by name.
///
/// The typed catalogue traits ([`WikiApi`](crate::WikiApi),
/// [`DokuwikiApi`](crate::DokuwikiApi), [`StructApi`](crate::StructApi)) are
/// implemented for every `RemoteCall`.
#[async_trait]
pub trait RemoteCall: Send + Sync {
    /// Call `method` with positional `params` and return the decoded value.
    async fn remote_call(&self, method: &str, params: Vec<Value>) -> Result<Value, Error>;
}

/// Client for a WikiRPC2 / DokuWiki XML-RPC endpoint.
///
/// The client is immutable after construction and cheap to clone. Calls may
/// be issued concurrently; they are not ordered or queued.
///
/// # Example
///
/// ```no_run
/// use wikirpc::{ClientOptions, WikiApi, WikiRpcClient};
///
/// # async fn example() -> Result<(), wikirpc::Error> {
/// let options = ClientOptions::new().basic_auth("alice", "secret");
/// let client = WikiRpcClient::new("https://wiki.example.org/lib/exe/xmlrpc.php", options)?;
///
/// let text = client.get_page("start", None).await?;
/// let title: String = client.call("dokuwiki.getTitle", vec![]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WikiRpcClient {
    endpoint: Endpoint,
    auth_kind: &'static str,
    transport: Arc<dyn Transport>,
}

impl WikiRpcClient {
    /// Create a client using the default `reqwest` transports.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the URL is invalid or the
    /// credentials cannot be sent as a header.
    pub fn new(endpoint: impl AsRef<str>, options: ClientOptions) -> Result<Self, Error> {
        Self::with_factory(endpoint, options, &HttpTransportFactory)
    }

    /// Create a client, building its transport with `factory`.
    ///
    /// `https` endpoints go through [`TransportFactory::secure`], all other
    /// schemes through [`TransportFactory::plain`].
    pub fn with_factory(
        endpoint: impl AsRef<str>,
        options: ClientOptions,
        factory: &dyn TransportFactory,
    ) -> Result<Self, Error> {
        let endpoint = Endpoint::new(endpoint)?;
        let auth = options.resolved_auth();

        let config = TransportConfig {
            endpoint: endpoint.clone(),
            authorization: auth.header_value()?,
            cookies: options.cookies,
            timeout: options.timeout,
            user_agent: options.user_agent.unwrap_or_else(|| USER_AGENT.to_string()),
        };

        let transport = match endpoint.security() {
            Security::Secure => factory.secure(config)?,
            Security::Plain => factory.plain(config)?,
        };

        debug!(
            endpoint = %endpoint,
            security = ?endpoint.security(),
            auth = auth.kind(),
            "created XML-RPC client"
        );

        Ok(Self {
            endpoint,
            auth_kind: auth.kind(),
            transport,
        })
    }

    /// Create a client around an existing transport.
    pub fn with_transport(endpoint: Endpoint, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint,
            auth_kind: "custom",
            transport,
        }
    }

    /// Returns the endpoint this client is bound to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Call a remote method and return the raw decoded value.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `method` is empty or a parameter holds a
    ///   non-finite double
    /// - [`Error::Transport`] if the HTTP exchange fails or returns a
    ///   non-success status without a fault body
    /// - [`Error::Protocol`] if the server returns an XML-RPC fault
    /// - [`Error::Decode`] if the body is not a valid `methodResponse`
    #[instrument(skip(self, params), fields(endpoint = %self.endpoint))]
    pub async fn call_value(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
        if method.is_empty() {
            return Err(Error::InvalidInput("method name must not be empty".to_string()));
        }
        params.iter().try_for_each(Value::validate)?;

        debug!(method, params = params.len(), "XML-RPC call");
        let request = MethodCall::new(method, params).encode();

        let response = self.transport.post(request).await?;
        trace!(status = response.status, "XML-RPC response");

        let decoded = MethodResponse::decode(&response.body);
        if !response.is_success() && !matches!(decoded, Ok(MethodResponse::Fault(_))) {
            return Err(TransportError::Status {
                status: response.status,
            }
            .into());
        }

        match decoded? {
            MethodResponse::Success(value) => Ok(value),
            MethodResponse::Fault(fault) => {
                debug!(method, code = fault.code, "XML-RPC fault");
                Err(fault.into())
            }
        }
    }

    /// Call a remote method and deserialize the result into `R`.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<R, Error> {
        self.call_value(method, params).await?.deserialize()
    }

    /// Name-based view of this client.
    pub fn proxy(&self) -> Proxy<'_> {
        Proxy::new(self)
    }
}

#[async_trait]
impl RemoteCall for WikiRpcClient {
    async fn remote_call(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
        self.call_value(method, params).await
    }
}

impl fmt::Debug for WikiRpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikiRpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("auth", &self.auth_kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = WikiRpcClient::new(
            "https://wiki.example.org/lib/exe/xmlrpc.php",
            ClientOptions::new(),
        )
        .unwrap();
        assert_eq!(client.endpoint().host(), "wiki.example.org");
    }

    #[test]
    fn invalid_url_is_configuration_error() {
        let err = WikiRpcClient::new("::not-a-url::", ClientOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn options_resolve_bearer_first() {
        let options = ClientOptions::new().basic_auth("a", "b").bearer_auth("tok");
        assert_eq!(options.resolved_auth(), Auth::bearer("tok"));

        let options = options.auth(Auth::basic("c", "d"));
        assert_eq!(options.bearer_auth, None);
        assert_eq!(options.resolved_auth(), Auth::basic("c", "d"));
    }

    #[test]
    fn debug_hides_secrets() {
        let options = ClientOptions::new().basic_auth("alice", "pw-123").bearer_auth("tok-456");
        let debug = format!("{options:?}");
        assert!(!debug.contains("pw-123"));
        assert!(!debug.contains("tok-456"));

        let client = WikiRpcClient::new("http://localhost/rpc", options).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("bearer"));
        assert!(!debug.contains("tok-456"));
    }

    #[tokio::test]
    async fn empty_method_name_is_rejected_before_sending() {
        let client = WikiRpcClient::new("http://127.0.0.1:9/rpc", ClientOptions::new()).unwrap();
        let err = client.call_value("", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn non_finite_params_are_rejected_before_sending() {
        // Nothing listens on port 9, so reaching the transport would be a
        // connection error instead
        let client = WikiRpcClient::new("http://127.0.0.1:9/rpc", ClientOptions::new()).unwrap();
        for bad in [f64::NAN, f64::INFINITY] {
            let err = client
                .call_value("wiki.x", crate::params!["start", bad])
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{err}");
        }
    }
}
