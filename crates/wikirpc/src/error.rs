//! Error types for the wikirpc library.
//!
//! Every failure surfaces as one [`Error`] with an explicit variant for
//! configuration, transport, protocol (XML-RPC fault) and decoding problems.

use std::fmt;
use thiserror::Error;

/// The unified error type for wikirpc operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The client could not be constructed from the given endpoint/options.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Network transport errors (DNS, TLS, connection, timeout, HTTP status).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a well-formed XML-RPC fault.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The response body could not be decoded into the requested shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The caller supplied something that cannot be sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns the fault when this error is an XML-RPC fault.
    pub fn as_fault(&self) -> Option<&ProtocolError> {
        match self {
            Error::Protocol(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Errors detected while constructing a client.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The endpoint is not a usable URL.
    #[error("invalid endpoint URL '{value}': {reason}")]
    Endpoint { value: String, reason: String },

    /// A credential cannot be carried in an HTTP header.
    #[error("invalid credentials: {reason}")]
    Credentials { reason: String },

    /// The HTTP client could not be built.
    #[error("cannot build HTTP client: {message}")]
    Client { message: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out in the HTTP collaborator.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// The server answered with a non-success HTTP status.
    #[error("HTTP status {status}")]
    Status { status: u16 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout { message }
        } else if err.is_connect() {
            // rustls failures surface as connect errors; tell them apart by source text
            if is_tls_failure(&err) {
                TransportError::Tls { message }
            } else {
                TransportError::Connection { message }
            }
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
            }
        } else {
            TransportError::Http { message }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        let text = inner.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("handshake") {
            return true;
        }
        source = inner.source();
    }
    false
}

/// An XML-RPC fault returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    /// Server-defined fault code.
    pub code: i32,
    /// Server-defined fault message.
    pub message: String,
}

impl ProtocolError {
    /// Create a new fault.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Check if this is an authentication/authorization fault.
    ///
    /// DokuWiki reports missing rights with codes in the 100s-400s range,
    /// the usual ones being 401 and 403.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.code, 401 | 403)
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProtocolError {}

/// Errors raised while decoding XML-RPC documents or converting values.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not well-formed XML.
    #[error("malformed XML: {message}")]
    Xml { message: String },

    /// The document does not follow the XML-RPC grammar.
    #[error("unexpected {found}, expected {expected}")]
    Unexpected { expected: String, found: String },

    /// A scalar could not be parsed.
    #[error("invalid <{kind}> value '{value}'")]
    Scalar { kind: String, value: String },

    /// The value does not fit the requested Rust type.
    #[error("cannot convert value: {message}")]
    Conversion { message: String },
}

impl From<quick_xml::Error> for DecodeError {
    fn from(err: quick_xml::Error) -> Self {
        DecodeError::Xml {
            message: err.to_string(),
        }
    }
}
