//! DokuWiki-specific (`dokuwiki.*`) methods.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::RemoteCall;
use crate::error::Error;
use crate::value::Value;

use super::wiki::PageAttrs;
use super::Method;

/// A page item from `dokuwiki.getPagelist` or `dokuwiki.search`.
///
/// `score`, `snippet` and `title` are only present in search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageItem {
    pub id: Option<String>,
    pub rev: Option<i64>,
    pub mtime: Option<i64>,
    pub size: Option<i64>,
    pub hash: Option<String>,
    pub score: Option<i64>,
    pub snippet: Option<String>,
    pub title: Option<String>,
}

/// Pages to lock and unlock in one `dokuwiki.setLocks` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlock: Option<Vec<String>>,
}

impl LockRequest {
    pub fn lock<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lock: Some(pages.into_iter().map(Into::into).collect()),
            unlock: None,
        }
    }

    pub fn unlock<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lock: None,
            unlock: Some(pages.into_iter().map(Into::into).collect()),
        }
    }
}

/// Outcome of `dokuwiki.setLocks`, grouped by result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LockResult {
    pub locked: Vec<String>,
    pub lockfail: Vec<String>,
    pub unlocked: Vec<String>,
    pub unlockfail: Vec<String>,
}

/// Input of `dokuwiki.createUser`.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateUser {
    pub user: String,
    /// Generated by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub name: String,
    pub mail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    /// Send the new user a notification mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<bool>,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("name", &self.name)
            .field("mail", &self.mail)
            .field("groups", &self.groups)
            .field("notify", &self.notify)
            .finish()
    }
}

/// Typed `dokuwiki.*` calls.
#[async_trait]
pub trait DokuwikiApi: RemoteCall {
    /// `dokuwiki.getPagelist`: pages in `namespace`; `options` are passed
    /// to the server's page search verbatim.
    async fn get_pagelist(
        &self,
        namespace: &str,
        options: Option<Value>,
    ) -> Result<Vec<PageItem>, Error> {
        let options = options.unwrap_or_else(|| Value::Struct(Default::default()));
        self.remote_call(
            Method::DokuwikiGetPagelist.as_str(),
            vec![namespace.into(), options],
        )
        .await?
        .deserialize()
    }

    /// `dokuwiki.getVersion`
    async fn get_version(&self) -> Result<String, Error> {
        self.remote_call(Method::DokuwikiGetVersion.as_str(), vec![])
            .await?
            .deserialize()
    }

    /// `dokuwiki.getTime`: server time as Unix timestamp.
    async fn get_time(&self) -> Result<i64, Error> {
        self.remote_call(Method::DokuwikiGetTime.as_str(), vec![])
            .await?
            .deserialize()
    }

    /// `dokuwiki.getXMLRPCAPIVersion`
    async fn get_xmlrpc_api_version(&self) -> Result<i64, Error> {
        self.remote_call(Method::DokuwikiGetXmlRpcApiVersion.as_str(), vec![])
            .await?
            .deserialize()
    }

    /// `dokuwiki.login`: the server answers with session cookies, which are
    /// only kept when the client was built with cookies enabled.
    async fn login(&self, user: &str, password: &str) -> Result<bool, Error> {
        self.remote_call(
            Method::DokuwikiLogin.as_str(),
            vec![user.into(), password.into()],
        )
        .await?
        .deserialize()
    }

    /// `dokuwiki.search`: fulltext search; the first results carry snippets.
    async fn search(&self, query: &str) -> Result<Vec<PageItem>, Error> {
        self.remote_call(Method::DokuwikiSearch.as_str(), vec![query.into()])
            .await?
            .deserialize()
    }

    /// `dokuwiki.getTitle`
    async fn get_title(&self) -> Result<String, Error> {
        self.remote_call(Method::DokuwikiGetTitle.as_str(), vec![])
            .await?
            .deserialize()
    }

    /// `dokuwiki.appendPage`
    async fn append_page(
        &self,
        pagename: &str,
        raw: &str,
        attrs: &PageAttrs,
    ) -> Result<bool, Error> {
        self.remote_call(
            Method::DokuwikiAppendPage.as_str(),
            vec![pagename.into(), raw.into(), Value::from_serialize(attrs)?],
        )
        .await?
        .deserialize()
    }

    /// `dokuwiki.setLocks`
    async fn set_locks(&self, request: &LockRequest) -> Result<LockResult, Error> {
        self.remote_call(
            Method::DokuwikiSetLocks.as_str(),
            vec![Value::from_serialize(request)?],
        )
        .await?
        .deserialize()
    }

    /// `dokuwiki.createUser`: the server rejects bad input with 400-range faults.
    async fn create_user(&self, user: &CreateUser) -> Result<bool, Error> {
        self.remote_call(
            Method::DokuwikiCreateUser.as_str(),
            vec![Value::from_serialize(user)?],
        )
        .await?
        .deserialize()
    }

    /// `dokuwiki.deleteUsers`
    async fn delete_users(&self, usernames: &[String]) -> Result<bool, Error> {
        self.remote_call(
            Method::DokuwikiDeleteUsers.as_str(),
            vec![Value::from_serialize(usernames)?],
        )
        .await?
        .deserialize()
    }
}

impl<T: RemoteCall + ?Sized> DokuwikiApi for T {}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Canned {
        answer: Value,
        params: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl RemoteCall for Canned {
        async fn remote_call(&self, _method: &str, params: Vec<Value>) -> Result<Value, Error> {
            *self.params.lock().unwrap() = params;
            Ok(self.answer.clone())
        }
    }

    fn canned(answer: Value) -> Canned {
        Canned {
            answer,
            params: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn set_locks_sends_only_given_lists() {
        let answer = Value::structure([
            ("locked", Value::from(vec!["a"])),
            ("lockfail", Value::from(vec!["b"])),
            ("unlocked", Value::Array(vec![])),
            ("unlockfail", Value::Array(vec![])),
        ]);
        let caller = canned(answer);

        let result = caller.set_locks(&LockRequest::lock(["a", "b"])).await.unwrap();
        assert_eq!(result.locked, vec!["a"]);
        assert_eq!(result.lockfail, vec!["b"]);
        assert!(result.unlocked.is_empty());

        let params = caller.params.lock().unwrap().clone();
        assert_eq!(
            params,
            vec![Value::structure([("lock", Value::from(vec!["a", "b"]))])]
        );
    }

    #[tokio::test]
    async fn create_user_omits_optional_fields() {
        let caller = canned(Value::Bool(true));
        let user = CreateUser {
            user: "bob".to_string(),
            name: "Bob".to_string(),
            mail: "bob@example.org".to_string(),
            ..Default::default()
        };
        assert!(caller.create_user(&user).await.unwrap());

        let params = caller.params.lock().unwrap().clone();
        let members = params[0].as_struct().unwrap();
        assert_eq!(members.len(), 3);
        assert!(!members.contains_key("password"));
    }

    #[tokio::test]
    async fn search_results_carry_snippets() {
        let caller = canned(Value::Array(vec![Value::structure([
            ("id", Value::from("wiki:syntax")),
            ("score", Value::Int(4)),
            ("snippet", Value::from("...<strong>syntax</strong>...")),
            ("mtime", Value::Int(1700000000)),
        ])]));
        let results = caller.search("syntax").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id.as_deref(), Some("wiki:syntax"));
        assert_eq!(results[0].score, Some(4));
        assert!(results[0].snippet.is_some());
    }

    #[test]
    fn create_user_debug_hides_password() {
        let user = CreateUser {
            user: "bob".to_string(),
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        assert!(!format!("{user:?}").contains("hunter2"));
    }
}
