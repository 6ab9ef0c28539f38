//! WikiRPC2 (`wiki.*`) methods.
//!
//! Shapes follow DokuWiki's documentation of the interface.
//!
//! See <https://www.dokuwiki.org/devel:xmlrpc#available_functions>.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::RemoteCall;
use crate::error::Error;
use crate::value::Value;

use super::{Method, Timestamp};

/// Information about a page, from `wiki.getPageInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    pub name: Option<String>,
    pub last_modified: Option<Timestamp>,
    pub author: Option<String>,
    /// Page version as Unix timestamp.
    pub version: Option<i64>,
}

/// One entry of `wiki.getPageVersions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageVersion {
    pub user: Option<String>,
    pub ip: Option<String>,
    /// Type of change (`C`reate, `E`dit, `e` minor edit, `D`elete, `R`evert).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sum: Option<String>,
    pub modified: Option<Timestamp>,
    pub version: Option<i64>,
}

/// One entry of `wiki.listLinks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Link {
    /// `local` or `extern`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Page id, or the full URL for external links.
    pub page: Option<String>,
    pub href: Option<String>,
}

/// One entry of `wiki.getAllPages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageEntry {
    pub id: Option<String>,
    pub perms: Option<i64>,
    pub size: Option<i64>,
    pub last_modified: Option<Timestamp>,
}

/// One entry of `wiki.getRecentChanges`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecentChange {
    pub name: Option<String>,
    pub last_modified: Option<Timestamp>,
    pub author: Option<String>,
    pub version: Option<i64>,
}

/// One entry of `wiki.getRecentMediaChanges`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecentMediaChange {
    pub name: Option<String>,
    pub last_modified: Option<Timestamp>,
    pub author: Option<String>,
    pub version: Option<i64>,
    pub perms: Option<i64>,
    pub size: Option<i64>,
}

/// One entry of `wiki.getAttachments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaEntry {
    pub id: Option<String>,
    pub file: Option<String>,
    pub size: Option<i64>,
    pub mtime: Option<i64>,
    pub last_modified: Option<Timestamp>,
    pub isimg: Option<bool>,
    pub writable: Option<bool>,
    pub perms: Option<i64>,
}

/// Result of `wiki.getAttachmentInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttachmentInfo {
    pub size: Option<i64>,
    pub last_modified: Option<Timestamp>,
}

/// Save attributes for `wiki.putPage` and `dokuwiki.appendPage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageAttrs {
    /// Change summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<String>,
    /// Mark as minor edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor: Option<bool>,
}

impl PageAttrs {
    pub fn summary(sum: impl Into<String>) -> Self {
        Self {
            sum: Some(sum.into()),
            minor: None,
        }
    }

    pub fn minor(mut self, minor: bool) -> Self {
        self.minor = Some(minor);
        self
    }
}

/// Parameters for `wiki.putAttachment`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PutAttachmentParams {
    /// Overwrite an existing media file with the same id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ow: Option<bool>,
}

fn options_value(options: Option<Value>) -> Value {
    options.unwrap_or_else(|| Value::Struct(Default::default()))
}

/// Typed `wiki.*` calls.
#[async_trait]
pub trait WikiApi: RemoteCall {
    /// `wiki.getRPCVersionSupported`
    async fn get_rpc_version_supported(&self) -> Result<Value, Error> {
        self.remote_call(Method::WikiGetRpcVersionSupported.as_str(), vec![])
            .await
    }

    /// `wiki.aclCheck`: permission level of the current user on `pagename`.
    async fn acl_check(&self, pagename: &str) -> Result<i64, Error> {
        self.remote_call(Method::WikiAclCheck.as_str(), vec![pagename.into()])
            .await?
            .deserialize()
    }

    /// `wiki.getPage`: raw wiki text, optionally as of `timestamp`.
    async fn get_page(&self, pagename: &str, timestamp: Option<i64>) -> Result<String, Error> {
        let mut params = vec![Value::from(pagename)];
        if let Some(timestamp) = timestamp {
            params.push(timestamp.into());
        }
        self.remote_call(Method::WikiGetPage.as_str(), params)
            .await?
            .deserialize()
    }

    /// `wiki.getPageVersion`
    async fn get_page_version(&self, pagename: &str, version: i64) -> Result<String, Error> {
        self.remote_call(
            Method::WikiGetPageVersion.as_str(),
            vec![pagename.into(), version.into()],
        )
        .await?
        .deserialize()
    }

    /// `wiki.getPageVersions`: history entries, `offset` skips newer ones.
    async fn get_page_versions(
        &self,
        pagename: &str,
        offset: i64,
    ) -> Result<Vec<PageVersion>, Error> {
        self.remote_call(
            Method::WikiGetPageVersions.as_str(),
            vec![pagename.into(), offset.into()],
        )
        .await?
        .deserialize()
    }

    /// `wiki.getPageInfo`
    async fn get_page_info(&self, pagename: &str) -> Result<PageInfo, Error> {
        self.remote_call(Method::WikiGetPageInfo.as_str(), vec![pagename.into()])
            .await?
            .deserialize()
    }

    /// `wiki.getPageInfoVersion`
    async fn get_page_info_version(&self, pagename: &str, version: i64) -> Result<PageInfo, Error> {
        self.remote_call(
            Method::WikiGetPageInfoVersion.as_str(),
            vec![pagename.into(), version.into()],
        )
        .await?
        .deserialize()
    }

    /// `wiki.getPageHTML`: rendered XHTML body.
    async fn get_page_html(&self, pagename: &str) -> Result<String, Error> {
        self.remote_call(Method::WikiGetPageHtml.as_str(), vec![pagename.into()])
            .await?
            .deserialize()
    }

    /// `wiki.getPageHTMLVersion`
    async fn get_page_html_version(&self, pagename: &str, version: i64) -> Result<String, Error> {
        self.remote_call(
            Method::WikiGetPageHtmlVersion.as_str(),
            vec![pagename.into(), version.into()],
        )
        .await?
        .deserialize()
    }

    /// `wiki.putPage`: save `raw` as the new text of `pagename`.
    async fn put_page(&self, pagename: &str, raw: &str, attrs: &PageAttrs) -> Result<bool, Error> {
        self.remote_call(
            Method::WikiPutPage.as_str(),
            vec![pagename.into(), raw.into(), Value::from_serialize(attrs)?],
        )
        .await?
        .deserialize()
    }

    /// `wiki.listLinks`
    async fn list_links(&self, pagename: &str) -> Result<Vec<Link>, Error> {
        self.remote_call(Method::WikiListLinks.as_str(), vec![pagename.into()])
            .await?
            .deserialize()
    }

    /// `wiki.getAllPages`
    async fn get_all_pages(&self) -> Result<Vec<PageEntry>, Error> {
        self.remote_call(Method::WikiGetAllPages.as_str(), vec![])
            .await?
            .deserialize()
    }

    /// `wiki.getBackLinks`: ids of pages linking to `pagename`.
    async fn get_back_links(&self, pagename: &str) -> Result<Vec<String>, Error> {
        self.remote_call(Method::WikiGetBackLinks.as_str(), vec![pagename.into()])
            .await?
            .deserialize()
    }

    /// `wiki.getRecentChanges`: most recent change per page since `timestamp`.
    async fn get_recent_changes(&self, timestamp: i64) -> Result<Vec<RecentChange>, Error> {
        self.remote_call(Method::WikiGetRecentChanges.as_str(), vec![timestamp.into()])
            .await?
            .deserialize()
    }

    /// `wiki.getRecentMediaChanges`
    async fn get_recent_media_changes(
        &self,
        timestamp: i64,
    ) -> Result<Vec<RecentMediaChange>, Error> {
        self.remote_call(
            Method::WikiGetRecentMediaChanges.as_str(),
            vec![timestamp.into()],
        )
        .await?
        .deserialize()
    }

    /// `wiki.getAttachments`: media in `namespace`; `options` go to the
    /// server's media search verbatim (empty struct when `None`).
    async fn get_attachments(
        &self,
        namespace: &str,
        options: Option<Value>,
    ) -> Result<Vec<MediaEntry>, Error> {
        self.remote_call(
            Method::WikiGetAttachments.as_str(),
            vec![namespace.into(), options_value(options)],
        )
        .await?
        .deserialize()
    }

    /// `wiki.getAttachment`: raw file content.
    async fn get_attachment(&self, id: &str) -> Result<Vec<u8>, Error> {
        self.remote_call(Method::WikiGetAttachment.as_str(), vec![id.into()])
            .await?
            .into_bytes()
    }

    /// `wiki.getAttachmentInfo`
    async fn get_attachment_info(&self, id: &str) -> Result<AttachmentInfo, Error> {
        self.remote_call(Method::WikiGetAttachmentInfo.as_str(), vec![id.into()])
            .await?
            .deserialize()
    }

    /// `wiki.putAttachment`: upload `data` (sent as `<base64>`) as media `id`.
    async fn put_attachment(
        &self,
        id: &str,
        data: Vec<u8>,
        params: &PutAttachmentParams,
    ) -> Result<(), Error> {
        self.remote_call(
            Method::WikiPutAttachment.as_str(),
            vec![id.into(), Value::Base64(data), Value::from_serialize(params)?],
        )
        .await?;
        Ok(())
    }

    /// `wiki.deleteAttachment`
    async fn delete_attachment(&self, id: &str) -> Result<(), Error> {
        self.remote_call(Method::WikiDeleteAttachment.as_str(), vec![id.into()])
            .await?;
        Ok(())
    }
}

impl<T: RemoteCall + ?Sized> WikiApi for T {}
