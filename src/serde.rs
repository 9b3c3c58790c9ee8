//! The serialized form of schemas.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A serialization/deserialization-friendly representation of a schema.
///
/// This struct is meant for use with the `serde` crate. It is excellent for
/// parsing schemas out of configuration files, but does not enforce the rules
/// about how schemas must be formed. For that, convert it into a
/// [`Schema`](../schema/struct.Schema.html) with `Schema::from_serde`.
///
/// Property maps keep the order in which they appear in the document, which
/// is the order in which validation visits them.
#[derive(Debug, PartialEq, Deserialize, Serialize, Default, Clone)]
pub struct SerdeSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub typ: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "elements")]
    pub elems: Option<Box<SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "properties")]
    pub props: Option<IndexMap<String, SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "optionalProperties")]
    pub opt_props: Option<IndexMap<String, SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "additionalProperties")]
    pub additional_props: Option<bool>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roundtrip_json() {
        let data = r#"{
  "type": "foo",
  "elements": {},
  "properties": {
    "b": {},
    "a": {}
  },
  "optionalProperties": {
    "a": {}
  },
  "values": {},
  "additionalProperties": true,
  "extra": "foo"
}"#;

        let parsed: SerdeSchema = serde_json::from_str(data).expect("failed to parse json");
        assert_eq!(
            parsed,
            SerdeSchema {
                typ: Some("foo".to_owned()),
                elems: Some(Box::new(SerdeSchema::default())),
                props: Some(
                    vec![
                        ("b".to_owned(), SerdeSchema::default()),
                        ("a".to_owned(), SerdeSchema::default())
                    ]
                    .into_iter()
                    .collect()
                ),
                opt_props: Some(
                    vec![("a".to_owned(), SerdeSchema::default())]
                        .into_iter()
                        .collect()
                ),
                values: Some(Box::new(SerdeSchema::default())),
                additional_props: Some(true),
                extra: vec![("extra".to_owned(), json!("foo"))]
                    .into_iter()
                    .collect(),
            }
        );

        let round_trip = serde_json::to_string_pretty(&parsed).expect("failed to serialize json");
        assert_eq!(round_trip, data);
    }
}
