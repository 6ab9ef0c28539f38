//! The XML-RPC value model.
//!
//! [`Value`] covers the full XML-RPC universe plus the two common extensions
//! DokuWiki and other servers emit (`<i8>` and `<nil/>`). Conversions to and
//! from `serde` types go through `serde_json::Value`, which lets callers ask
//! for typed results with any `DeserializeOwned` type.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DecodeError, Error};

/// Wire format of `<dateTime.iso8601>` values produced by this crate.
pub const DATETIME_WIRE_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Format used when a date is handed to `serde`.
const DATETIME_JSON_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<int>` / `<i4>`
    Int(i32),
    /// `<i8>` extension
    Long(i64),
    /// `<boolean>`
    Bool(bool),
    /// `<string>` or untyped text
    String(String),
    /// `<double>`
    Double(f64),
    /// `<dateTime.iso8601>`, timezone-less as XML-RPC defines it
    DateTime(NaiveDateTime),
    /// `<base64>`
    Base64(Vec<u8>),
    /// `<array>`
    Array(Vec<Value>),
    /// `<struct>`
    Struct(BTreeMap<String, Value>),
    /// `<nil/>` extension
    Nil,
}

impl Value {
    /// Build a struct value from key/value pairs.
    pub fn structure<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert any serializable Rust value into an XML-RPC value.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        let json = serde_json::to_value(value).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Self::from_json(json)
    }

    /// Convert a JSON value into an XML-RPC value.
    ///
    /// Integers that fit into 32 bits become `<int>`, larger ones `<i8>`.
    pub fn from_json(json: serde_json::Value) -> Result<Self, Error> {
        Ok(match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => Value::Int(small),
                        Err(_) => Value::Long(i),
                    }
                } else if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                    Value::Double(f)
                } else {
                    return Err(Error::InvalidInput(format!(
                        "number {n} does not fit an XML-RPC integer"
                    )));
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => Value::Struct(
                map.into_iter()
                    .map(|(k, v)| Ok((k, Value::from_json(v)?)))
                    .collect::<Result<_, Error>>()?,
            ),
        })
    }

    /// Convert into a JSON value.
    ///
    /// Dates become `YYYY-MM-DDTHH:MM:SS` strings and binary data becomes a
    /// base64 string. Non-finite doubles become `null`.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Int(i) => i.into(),
            Value::Long(i) => i.into(),
            Value::Bool(b) => b.into(),
            Value::String(s) => s.into(),
            Value::Double(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::DateTime(dt) => dt.format(DATETIME_JSON_FORMAT).to_string().into(),
            Value::Base64(bytes) => STANDARD.encode(bytes).into(),
            Value::Array(items) => items.into_iter().map(Value::into_json).collect(),
            Value::Struct(members) => serde_json::Value::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
            Value::Nil => serde_json::Value::Null,
        }
    }

    /// Deserialize this value into a Rust type.
    pub fn deserialize<R: DeserializeOwned>(self) -> Result<R, Error> {
        serde_json::from_value(self.into_json()).map_err(|e| {
            DecodeError::Conversion {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the string content for `String` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content for `Int` and `Long` values.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i64::from(*i)),
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean content for `Bool` values.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the member map for `Struct` values.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Returns the items for `Array` values.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the raw bytes of binary data.
    ///
    /// Some servers send attachments as base64 text inside a `<string>`;
    /// such strings are decoded as well.
    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self {
            Value::Base64(bytes) => Ok(bytes),
            Value::String(s) => STANDARD.decode(s.trim()).map_err(|e| {
                DecodeError::Conversion {
                    message: format!("string is not base64: {e}"),
                }
                .into()
            }),
            other => Err(DecodeError::Conversion {
                message: format!("expected binary data, found {}", other.type_name()),
            }
            .into()),
        }
    }

    /// Check that the value can go on the wire.
    ///
    /// `<double>` has no spelling for NaN or infinities.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Value::Double(f) if !f.is_finite() => Err(Error::InvalidInput(format!(
                "{f} cannot be sent as an XML-RPC double"
            ))),
            Value::Array(items) => items.iter().try_for_each(Value::validate),
            Value::Struct(members) => members.values().try_for_each(Value::validate),
            _ => Ok(()),
        }
    }

    /// The XML-RPC element name of this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Long(_) => "i8",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Double(_) => "double",
            Value::DateTime(_) => "dateTime.iso8601",
            Value::Base64(_) => "base64",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
            Value::Nil => "nil",
        }
    }
}

/// Parse an `<dateTime.iso8601>` payload.
///
/// Accepts the compact XML-RPC form (`20240131T08:15:00`), the dashed ISO
/// form, and RFC 3339 with an offset (converted to UTC).
pub(crate) fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    const NAIVE_FORMATS: [&str; 4] = [
        DATETIME_WIRE_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y%m%dT%H%M%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y%m%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|dt| dt.naive_utc())
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        match i32::try_from(v) {
            Ok(small) => Value::Int(small),
            Err(_) => Value::Long(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Struct(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn non_finite_doubles_are_rejected_anywhere() {
        assert!(Value::Double(1.5).validate().is_ok());
        assert!(matches!(
            Value::Double(f64::NAN).validate(),
            Err(Error::InvalidInput(_))
        ));
        let nested = Value::structure([(
            "a",
            Value::Array(vec![Value::Int(1), Value::Double(f64::NEG_INFINITY)]),
        )]);
        assert!(matches!(nested.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn json_numbers_pick_the_narrowest_integer() {
        assert_eq!(Value::from_json(json!(7)).unwrap(), Value::Int(7));
        assert_eq!(
            Value::from_json(json!(5_000_000_000_i64)).unwrap(),
            Value::Long(5_000_000_000)
        );
        assert_eq!(Value::from_json(json!(1.5)).unwrap(), Value::Double(1.5));
        assert!(Value::from_json(json!(u64::MAX)).is_err());
    }

    #[test]
    fn serialize_struct_params() {
        #[derive(Serialize)]
        struct Attrs {
            sum: &'static str,
            minor: bool,
        }

        let value = Value::from_serialize(&Attrs {
            sum: "typo",
            minor: true,
        })
        .unwrap();

        assert_eq!(
            value,
            Value::structure([("minor", Value::Bool(true)), ("sum", Value::from("typo"))])
        );
    }

    #[test]
    fn deserialize_into_typed_result() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct Info {
            name: String,
            last_modified: String,
            version: i64,
        }

        let modified = parse_datetime("20240131T08:15:00").unwrap();
        let value = Value::structure([
            ("name", Value::from("start")),
            ("lastModified", Value::DateTime(modified)),
            ("version", Value::Int(1706688900)),
        ]);

        let info: Info = value.deserialize().unwrap();
        assert_eq!(info.name, "start");
        assert_eq!(info.last_modified, "2024-01-31T08:15:00");
        assert_eq!(info.version, 1706688900);
    }

    #[test]
    fn deserialize_mismatch_is_a_decode_error() {
        let err = Value::from("text").deserialize::<i32>().unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Conversion { .. })));
    }

    #[test]
    fn datetime_formats() {
        let expected = NaiveDateTime::parse_from_str("2024-01-31 08:15:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(parse_datetime("20240131T08:15:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-31T08:15:00"), Some(expected));
        assert_eq!(parse_datetime("20240131T081500"), Some(expected));
        assert_eq!(parse_datetime("2024-01-31T09:15:00+01:00"), Some(expected));
        assert_eq!(parse_datetime("yesterday"), None);
    }

    #[test]
    fn bytes_from_base64_or_string() {
        assert_eq!(Value::Base64(vec![1, 2]).into_bytes().unwrap(), vec![1, 2]);
        assert_eq!(Value::from("aGk=").into_bytes().unwrap(), b"hi".to_vec());
        assert!(Value::Int(1).into_bytes().is_err());
    }
}
