//! The remote method catalogue.
//!
//! [`Method`] enumerates every known wire name. The typed traits expose one
//! async fn per method; they are implemented for every
//! [`RemoteCall`](crate::RemoteCall), so they work on the client directly.
//!
//! Result types describe what DokuWiki documents for each method. They are
//! passthrough shapes: every field is optional and unknown fields are
//! ignored, nothing is validated locally.

mod dokuwiki;
mod plugin_struct;
mod wiki;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use dokuwiki::{CreateUser, DokuwikiApi, LockRequest, LockResult, PageItem};
pub use plugin_struct::{FieldValue, StructApi, StructData};
pub use wiki::{
    AttachmentInfo, Link, MediaEntry, PageAttrs, PageEntry, PageInfo, PageVersion,
    PutAttachmentParams, RecentChange, RecentMediaChange, WikiApi,
};

macro_rules! methods {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// A remote method known to the catalogue.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Method {
            $($(#[$doc])* $variant,)*
        }

        impl Method {
            /// Every catalogue entry, in declaration order.
            pub const ALL: &'static [Method] = &[$(Method::$variant,)*];

            /// The wire name, e.g. `wiki.getPage`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Method::$variant => $name,)*
                }
            }
        }
    };
}

methods! {
    /// Supported WikiRPC API version (DokuWiki answers 2).
    WikiGetRpcVersionSupported => "wiki.getRPCVersionSupported",
    /// Permission of the current user on a page.
    WikiAclCheck => "wiki.aclCheck",
    /// Raw wiki text of a page, optionally at a timestamp.
    WikiGetPage => "wiki.getPage",
    WikiGetPageVersion => "wiki.getPageVersion",
    WikiGetPageVersions => "wiki.getPageVersions",
    WikiGetPageInfo => "wiki.getPageInfo",
    WikiGetPageInfoVersion => "wiki.getPageInfoVersion",
    WikiGetPageHtml => "wiki.getPageHTML",
    WikiGetPageHtmlVersion => "wiki.getPageHTMLVersion",
    /// Save a page (creates a revision).
    WikiPutPage => "wiki.putPage",
    WikiListLinks => "wiki.listLinks",
    WikiGetAllPages => "wiki.getAllPages",
    WikiGetBackLinks => "wiki.getBackLinks",
    WikiGetRecentChanges => "wiki.getRecentChanges",
    WikiGetRecentMediaChanges => "wiki.getRecentMediaChanges",
    WikiGetAttachments => "wiki.getAttachments",
    WikiGetAttachment => "wiki.getAttachment",
    WikiGetAttachmentInfo => "wiki.getAttachmentInfo",
    WikiPutAttachment => "wiki.putAttachment",
    WikiDeleteAttachment => "wiki.deleteAttachment",
    DokuwikiGetPagelist => "dokuwiki.getPagelist",
    DokuwikiGetVersion => "dokuwiki.getVersion",
    DokuwikiGetTime => "dokuwiki.getTime",
    DokuwikiGetXmlRpcApiVersion => "dokuwiki.getXMLRPCAPIVersion",
    /// Cookie-based login; needs a client with cookies enabled to be useful.
    DokuwikiLogin => "dokuwiki.login",
    DokuwikiSearch => "dokuwiki.search",
    DokuwikiGetTitle => "dokuwiki.getTitle",
    DokuwikiAppendPage => "dokuwiki.appendPage",
    DokuwikiSetLocks => "dokuwiki.setLocks",
    DokuwikiCreateUser => "dokuwiki.createUser",
    DokuwikiDeleteUsers => "dokuwiki.deleteUsers",
    StructGetData => "plugin.struct.getData",
    StructSaveData => "plugin.struct.saveData",
}

impl Method {
    /// The namespace part of the wire name (`wiki`, `dokuwiki`, `plugin.struct`).
    pub fn namespace(self) -> &'static str {
        let name = self.as_str();
        name.rsplit_once('.').map_or(name, |(namespace, _)| namespace)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown remote method '{s}'")))
    }
}

/// A modification time as servers report it.
///
/// DokuWiki mixes `<dateTime.iso8601>` values and integer Unix timestamps
/// between methods and versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(i64),
    Date(NaiveDateTime),
    Text(String),
}

impl Timestamp {
    /// Seconds since the Unix epoch, if the value is a time at all.
    pub fn unix(&self) -> Option<i64> {
        match self {
            Timestamp::Unix(secs) => Some(*secs),
            Timestamp::Date(dt) => Some(dt.and_utc().timestamp()),
            Timestamp::Text(_) => None,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Unix(secs) => write!(f, "{secs}"),
            Timestamp::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Timestamp::Text(text) => f.write_str(text),
        }
    }
}
