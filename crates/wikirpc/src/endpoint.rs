//! Endpoint URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigurationError, Error};

/// Which transport path a client uses for its endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Security {
    /// Any scheme other than `https`.
    Plain,
    /// The `https` scheme.
    Secure,
}

/// A validated XML-RPC endpoint URL.
///
/// The whole URL, including its path (for DokuWiki usually
/// `/lib/exe/xmlrpc.php`), is the POST target of every call.
///
/// # Example
///
/// ```
/// use wikirpc::{Endpoint, Security};
///
/// let endpoint = Endpoint::new("https://wiki.example.org/lib/exe/xmlrpc.php").unwrap();
/// assert_eq!(endpoint.host(), "wiki.example.org");
/// assert_eq!(endpoint.port(), 443);
/// assert_eq!(endpoint.security(), Security::Secure);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Parse and validate an endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the string is not an absolute URL
    /// with a host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| ConfigurationError::Endpoint {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigurationError::Endpoint {
                value: s.to_string(),
                reason: "must be an absolute URL with a host".to_string(),
            }
            .into());
        }

        Ok(Self(url))
    }

    /// Returns the transport path selected by the scheme.
    pub fn security(&self) -> Security {
        if self.0.scheme() == "https" {
            Security::Secure
        } else {
            Security::Plain
        }
    }

    /// Returns the URL scheme.
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Returns the host name or address.
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// Returns the explicit port, or the scheme's default.
    pub fn port(&self) -> u16 {
        self.0.port_or_known_default().unwrap_or(0)
    }

    /// Returns the full URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Endpoint::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_is_secure() {
        let endpoint = Endpoint::new("https://wiki.example.org/lib/exe/xmlrpc.php").unwrap();
        assert_eq!(endpoint.security(), Security::Secure);
        assert_eq!(endpoint.scheme(), "https");
        assert_eq!(endpoint.host(), "wiki.example.org");
        assert_eq!(endpoint.port(), 443);
    }

    #[test]
    fn other_schemes_are_plain() {
        let endpoint = Endpoint::new("http://localhost:8080/lib/exe/xmlrpc.php").unwrap();
        assert_eq!(endpoint.security(), Security::Plain);
        assert_eq!(endpoint.port(), 8080);

        let endpoint = Endpoint::new("HTTP://127.0.0.1/rpc").unwrap();
        assert_eq!(endpoint.security(), Security::Plain);
        assert_eq!(endpoint.port(), 80);
    }

    #[test]
    fn path_is_kept() {
        let endpoint = Endpoint::new("https://wiki.example.org/lib/exe/xmlrpc.php").unwrap();
        assert_eq!(
            endpoint.as_str(),
            "https://wiki.example.org/lib/exe/xmlrpc.php"
        );
    }

    #[test]
    fn invalid_urls() {
        assert!(matches!(
            Endpoint::new("not a url"),
            Err(Error::Configuration(_))
        ));
        assert!(Endpoint::new("/lib/exe/xmlrpc.php").is_err());
        assert!(Endpoint::new("mailto:admin@example.org").is_err());
    }

    #[test]
    fn serde_roundtrip_validates() {
        let endpoint: Endpoint = serde_json::from_str("\"https://wiki.example.org/rpc\"").unwrap();
        assert_eq!(endpoint.host(), "wiki.example.org");
        assert!(serde_json::from_str::<Endpoint>("\"nope\"").is_err());
    }
}
