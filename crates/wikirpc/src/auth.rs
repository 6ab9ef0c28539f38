//! Authentication configuration.
//!
//! A client carries exactly one [`Auth`] for its lifetime. It is turned into
//! the `Authorization` header sent with every request.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Error};

/// HTTP Basic credentials.
///
/// The password is never exposed in Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub user: String,
    pub pass: String,
}

impl BasicAuth {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .finish()
    }
}

/// The credential form a client authenticates with.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    /// No `Authorization` header.
    #[default]
    None,
    /// `Authorization: Basic base64(user:pass)`
    Basic(BasicAuth),
    /// `Authorization: Bearer <token>`, token sent verbatim.
    Bearer(String),
}

impl Auth {
    pub fn basic(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Auth::Basic(BasicAuth::new(user, pass))
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    /// Resolve the optional pair of credential forms.
    ///
    /// When both are given the bearer token wins and the basic credentials
    /// are ignored.
    pub fn resolve(basic: Option<BasicAuth>, bearer: Option<String>) -> Self {
        match (basic, bearer) {
            (_, Some(token)) => Auth::Bearer(token),
            (Some(basic), None) => Auth::Basic(basic),
            (None, None) => Auth::None,
        }
    }

    /// Returns the `Authorization` header value, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the credential contains bytes
    /// that cannot appear in an HTTP header.
    pub fn header_value(&self) -> Result<Option<HeaderValue>, Error> {
        let raw = match self {
            Auth::None => return Ok(None),
            Auth::Basic(basic) => {
                let encoded = STANDARD.encode(format!("{}:{}", basic.user, basic.pass));
                format!("Basic {encoded}")
            }
            Auth::Bearer(token) => format!("Bearer {token}"),
        };

        let mut value = HeaderValue::from_str(&raw).map_err(|_| ConfigurationError::Credentials {
            reason: "credential contains characters not allowed in an HTTP header".to_string(),
        })?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    /// Short name of the credential form, safe for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::None => "none",
            Auth::Basic(_) => "basic",
            Auth::Bearer(_) => "bearer",
        }
    }
}

// Hide secrets in Debug output
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic(basic) => f.debug_tuple("Basic").field(basic).finish(),
            Auth::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
        }
    }
}
