//! Name-based dispatch over a [`RemoteCall`].
//!
//! `proxy.method("wiki.getPage").invoke(params!["start"])` sends exactly the
//! same request as `client.call("wiki.getPage", params!["start"])`.

use serde::de::DeserializeOwned;

use crate::catalogue::Method;
use crate::client::RemoteCall;
use crate::error::Error;
use crate::value::Value;

/// Build a positional parameter list from anything convertible into [`Value`].
///
/// ```
/// use wikirpc::{params, Value};
///
/// let params = params!["start", 0];
/// assert_eq!(params, vec![Value::from("start"), Value::Int(0)]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($param:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($param)),+]
    };
}

/// A view of a caller that hands out handles to remote methods by name.
#[derive(Clone, Copy)]
pub struct Proxy<'a> {
    caller: &'a dyn RemoteCall,
}

impl<'a> Proxy<'a> {
    pub fn new(caller: &'a dyn RemoteCall) -> Self {
        Self { caller }
    }

    /// Handle for the remote method `name`.
    ///
    /// The name is not checked against the catalogue.
    pub fn method(&self, name: impl Into<String>) -> RemoteMethod<'a> {
        RemoteMethod {
            caller: self.caller,
            name: name.into(),
        }
    }

    /// Handle for a catalogue entry.
    pub fn get(&self, method: Method) -> RemoteMethod<'a> {
        self.method(method.as_str())
    }
}

/// A remote method bound to a caller.
#[derive(Clone)]
pub struct RemoteMethod<'a> {
    caller: &'a dyn RemoteCall,
    name: String,
}

impl RemoteMethod<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with positional parameters and return the raw value.
    pub async fn invoke_value(&self, params: Vec<Value>) -> Result<Value, Error> {
        self.caller.remote_call(&self.name, params).await
    }

    /// Invoke with positional parameters and deserialize the result.
    pub async fn invoke<R: DeserializeOwned>(&self, params: Vec<Value>) -> Result<R, Error> {
        self.invoke_value(params).await?.deserialize()
    }
}
