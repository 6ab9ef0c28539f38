//! wikirpc - typed XML-RPC client for DokuWiki and WikiRPC2 servers.
//!
//! A [`WikiRpcClient`] is bound to one endpoint and one credential form and
//! performs independent remote calls. Calls can be made by name
//! ([`WikiRpcClient::call`], [`Proxy`]) or through the typed catalogue traits
//! [`WikiApi`], [`DokuwikiApi`] and [`StructApi`].
//!
//! # Example
//!
//! ```no_run
//! use wikirpc::{ClientOptions, DokuwikiApi, PageAttrs, WikiApi, WikiRpcClient, params};
//!
//! # async fn example() -> Result<(), wikirpc::Error> {
//! let client = WikiRpcClient::new(
//!     "https://wiki.example.org/lib/exe/xmlrpc.php",
//!     ClientOptions::new().bearer_auth("api-token"),
//! )?;
//!
//! println!("{} ({})", client.get_title().await?, client.get_version().await?);
//!
//! let text = client.get_page("start", None).await?;
//! client
//!     .put_page("start", &format!("{text}\n\nEdited."), &PageAttrs::summary("edit"))
//!     .await?;
//!
//! // Any method by name, including ones the catalogue does not know
//! let links: serde_json::Value = client.proxy().method("wiki.listLinks").invoke(params!["start"]).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod catalogue;
pub mod client;
pub mod codec;
pub mod endpoint;
pub mod error;
pub mod proxy;
pub mod transport;
pub mod value;

// Re-export primary types at crate root for convenience
pub use auth::{Auth, BasicAuth};
pub use catalogue::{
    AttachmentInfo, CreateUser, DokuwikiApi, FieldValue, Link, LockRequest, LockResult,
    MediaEntry, Method, PageAttrs, PageEntry, PageInfo, PageItem, PageVersion,
    PutAttachmentParams, RecentChange, RecentMediaChange, StructApi, StructData, Timestamp,
    WikiApi,
};
pub use client::{ClientOptions, RemoteCall, WikiRpcClient};
pub use endpoint::{Endpoint, Security};
pub use error::{ConfigurationError, DecodeError, Error, ProtocolError, TransportError};
pub use proxy::{Proxy, RemoteMethod};
pub use value::Value;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
