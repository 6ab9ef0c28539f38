//! Struct plugin (`plugin.struct.*`) methods.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::client::RemoteCall;
use crate::error::Error;
use crate::value::Value;

use super::Method;

/// Structured data of a page: schema name → field label → value.
pub type StructData = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// A field value for `plugin.struct.saveData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multi(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Multi(values)
    }
}

/// Typed `plugin.struct.*` calls.
#[async_trait]
pub trait StructApi: RemoteCall {
    /// `plugin.struct.getData`: data of `page`, for one `schema` (all when
    /// `None`) and as of `timestamp` (now when `None`).
    async fn get_struct_data(
        &self,
        page: &str,
        schema: Option<&str>,
        timestamp: Option<i64>,
    ) -> Result<StructData, Error> {
        let mut params = vec![Value::from(page)];
        // positional: a timestamp needs the schema slot filled
        match (schema, timestamp) {
            (None, None) => {}
            (schema, None) => params.push(schema.unwrap_or_default().into()),
            (schema, Some(timestamp)) => {
                params.push(schema.unwrap_or_default().into());
                params.push(timestamp.into());
            }
        }
        self.remote_call(Method::StructGetData.as_str(), params)
            .await?
            .deserialize()
    }

    /// `plugin.struct.saveData`: creates a new page revision.
    async fn save_struct_data(
        &self,
        page: &str,
        data: &BTreeMap<String, BTreeMap<String, FieldValue>>,
        summary: &str,
    ) -> Result<bool, Error> {
        self.remote_call(
            Method::StructSaveData.as_str(),
            vec![page.into(), Value::from_serialize(data)?, summary.into()],
        )
        .await?
        .deserialize()
    }
}

impl<T: RemoteCall + ?Sized> StructApi for T {}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        params: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl RemoteCall for Recorder {
        async fn remote_call(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
            *self.params.lock().unwrap() = params;
            Ok(match method {
                "plugin.struct.getData" => Value::structure([(
                    "book",
                    Value::structure([
                        ("title", Value::from("Dune")),
                        ("tags", Value::from(vec!["scifi", "classic"])),
                    ]),
                )]),
                _ => Value::Bool(true),
            })
        }
    }

    #[tokio::test]
    async fn get_data_fills_schema_slot_for_timestamp() {
        let recorder = Recorder::default();

        recorder.get_struct_data("start", None, None).await.unwrap();
        assert_eq!(*recorder.params.lock().unwrap(), vec![Value::from("start")]);

        recorder
            .get_struct_data("start", None, Some(1700000000))
            .await
            .unwrap();
        assert_eq!(
            *recorder.params.lock().unwrap(),
            vec![Value::from("start"), Value::from(""), Value::Int(1700000000)]
        );
    }

    #[tokio::test]
    async fn get_data_shape() {
        let data = Recorder::default()
            .get_struct_data("start", Some("book"), None)
            .await
            .unwrap();
        assert_eq!(data["book"]["title"], serde_json::json!("Dune"));
        assert_eq!(data["book"]["tags"], serde_json::json!(["scifi", "classic"]));
    }

    #[tokio::test]
    async fn save_data_mixes_single_and_multi_values() {
        let recorder = Recorder::default();
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), FieldValue::from("Dune"));
        fields.insert(
            "tags".to_string(),
            FieldValue::from(vec!["scifi".to_string(), "classic".to_string()]),
        );
        let mut data = BTreeMap::new();
        data.insert("book".to_string(), fields);

        assert!(recorder.save_struct_data("start", &data, "import").await.unwrap());

        let params = recorder.params.lock().unwrap().clone();
        assert_eq!(
            params[1],
            Value::structure([(
                "book",
                Value::structure([
                    ("tags", Value::from(vec!["scifi", "classic"])),
                    ("title", Value::from("Dune")),
                ])
            )])
        );
        assert_eq!(params[2], Value::from("import"));
    }
}
