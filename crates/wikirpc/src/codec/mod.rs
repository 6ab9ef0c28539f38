//! XML-RPC document encoding and decoding.
//!
//! The client side only ever encodes [`MethodCall`]s and decodes
//! [`MethodResponse`]s. The mirror operations exist for stub servers.

mod decode;
mod encode;

use crate::error::{DecodeError, ProtocolError};
use crate::value::Value;

/// Content type sent with every request.
pub const CONTENT_TYPE: &str = "text/xml";

/// A `<methodCall>` document.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Remote procedure name, e.g. `wiki.getPage`.
    pub name: String,
    /// Positional parameters.
    pub params: Vec<Value>,
}

impl MethodCall {
    pub fn new(name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Serialize into an XML document.
    pub fn encode(&self) -> String {
        encode::method_call(&self.name, &self.params)
    }

    /// Parse an XML document.
    pub fn decode(xml: &str) -> Result<Self, DecodeError> {
        decode::method_call(xml)
    }
}

/// A `<methodResponse>` document: either a value or a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Fault(ProtocolError),
}

impl MethodResponse {
    /// Serialize into an XML document.
    pub fn encode(&self) -> String {
        match self {
            MethodResponse::Success(value) => encode::method_response(value),
            MethodResponse::Fault(fault) => encode::fault_response(fault),
        }
    }

    /// Parse an XML document.
    pub fn decode(xml: &str) -> Result<Self, DecodeError> {
        decode::method_response(xml)
    }

    /// Convert into a result, turning faults into errors.
    pub fn into_result(self) -> Result<Value, ProtocolError> {
        match self {
            MethodResponse::Success(value) => Ok(value),
            MethodResponse::Fault(fault) => Err(fault),
        }
    }
}
