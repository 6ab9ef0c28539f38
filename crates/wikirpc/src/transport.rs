//! HTTP transport for XML-RPC documents.
//!
//! A [`TransportFactory`] turns a [`TransportConfig`] into a [`Transport`]
//! through one of two paths: `plain` for non-`https` endpoints and `secure`
//! for `https` endpoints. [`HttpTransportFactory`] builds `reqwest` clients.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, trace};

use crate::codec;
use crate::endpoint::Endpoint;
use crate::error::{ConfigurationError, Error};

/// Default User-Agent header.
pub const USER_AGENT: &str = concat!("wikirpc/", env!("CARGO_PKG_VERSION"));

/// Everything a transport needs to reach the endpoint.
#[derive(Clone)]
pub struct TransportConfig {
    pub endpoint: Endpoint,
    /// Pre-built `Authorization` header, marked sensitive.
    pub authorization: Option<HeaderValue>,
    /// Keep cookies between calls (needed after `dokuwiki.login`).
    pub cookies: bool,
    /// Deadline handed to the HTTP client; `None` means no deadline.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("authorization", &self.authorization.as_ref().map(|_| "[REDACTED]"))
            .field("cookies", &self.cookies)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Raw HTTP answer to a posted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one XML document and returns the server's answer.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn post(&self, body: String) -> Result<TransportResponse, Error>;
}

/// Creates transports for the two security modes.
pub trait TransportFactory {
    /// Transport for non-`https` endpoints.
    fn plain(&self, config: TransportConfig) -> Result<Arc<dyn Transport>, Error>;

    /// Transport for `https` endpoints.
    fn secure(&self, config: TransportConfig) -> Result<Arc<dyn Transport>, Error>;
}

/// Factory for [`HttpTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransportFactory;

impl TransportFactory for HttpTransportFactory {
    fn plain(&self, config: TransportConfig) -> Result<Arc<dyn Transport>, Error> {
        let builder = reqwest::Client::builder().https_only(false);
        Ok(Arc::new(HttpTransport::build(builder, config)?))
    }

    fn secure(&self, config: TransportConfig) -> Result<Arc<dyn Transport>, Error> {
        let builder = reqwest::Client::builder()
            .use_rustls_tls()
            .https_only(true);
        Ok(Arc::new(HttpTransport::build(builder, config)?))
    }
}

/// `reqwest`-backed transport posting to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    fn build(builder: reqwest::ClientBuilder, config: TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(authorization) = config.authorization {
            headers.insert(reqwest::header::AUTHORIZATION, authorization);
        }

        let mut builder = builder
            .user_agent(config.user_agent)
            .default_headers(headers)
            .cookie_store(config.cookies);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| ConfigurationError::Client {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: String) -> Result<TransportResponse, Error> {
        debug!(endpoint = %self.endpoint, bytes = body.len(), "POST");

        let response = self
            .client
            .post(self.endpoint.as_url().clone())
            .header(CONTENT_TYPE, codec::CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        trace!(status, bytes = body.len(), "response received");

        Ok(TransportResponse { status, body })
    }
}
