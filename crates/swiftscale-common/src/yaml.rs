//! YAML handling for manifests
//!
//! Parsing goes through yaml-rust2 into `serde_json::Value` so documents can be
//! dispatched on `kind` before typed deserialization. Rendering uses serde_yaml.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

/// Separator placed between documents of a multi-document manifest
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Error type for YAML parsing and rendering
#[derive(Debug, Clone)]
pub struct YamlError(String);

impl std::fmt::Display for YamlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for YamlError {}

/// Parse a single YAML document into a serde_json::Value.
///
/// Returns `Value::Null` for empty input.
pub fn parse_yaml(input: &str) -> Result<Value, YamlError> {
    let docs = YamlLoader::load_from_str(input).map_err(|e| YamlError(e.to_string()))?;
    match docs.into_iter().next() {
        Some(doc) => yaml_to_json(doc),
        None => Ok(Value::Null),
    }
}

/// Parse a multi-document manifest.
///
/// Empty documents (a leading or trailing `---`) are dropped.
pub fn parse_yaml_multi(input: &str) -> Result<Vec<Value>, YamlError> {
    let docs = YamlLoader::load_from_str(input).map_err(|e| YamlError(e.to_string()))?;
    docs.into_iter()
        .filter(|doc| !doc.is_null())
        .map(yaml_to_json)
        .collect()
}

/// Render a value as one YAML document (without a leading separator).
pub fn to_yaml_document<T: Serialize>(value: &T) -> Result<String, YamlError> {
    serde_yaml::to_string(value).map_err(|e| YamlError(e.to_string()))
}

/// Join rendered documents into one manifest.
pub fn join_documents<I, S>(docs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, doc) in docs.into_iter().enumerate() {
        if i > 0 {
            out.push_str(DOCUMENT_SEPARATOR);
        }
        let doc = doc.as_ref();
        out.push_str(doc);
        if !doc.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn yaml_to_json(yaml: Yaml) -> Result<Value, YamlError> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Boolean(b) => Ok(Value::Bool(b)),
        Yaml::Integer(i) => Ok(Value::Number(i.into())),
        Yaml::Real(s) => {
            let f: f64 = s
                .parse()
                .map_err(|e: std::num::ParseFloatError| YamlError(e.to_string()))?;
            Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null))
        }
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Array(arr) => arr
            .into_iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Hash(map) => map
            .into_iter()
            .map(|(k, v)| {
                let key = match k {
                    Yaml::String(s) => s,
                    Yaml::Integer(i) => i.to_string(),
                    Yaml::Real(r) => r,
                    Yaml::Boolean(b) => b.to_string(),
                    _ => return Err(YamlError("unsupported YAML key type".to_string())),
                };
                yaml_to_json(v).map(|v| (key, v))
            })
            .collect::<Result<Map<String, Value>, _>>()
            .map(Value::Object),
        Yaml::Alias(_) => Err(YamlError("YAML aliases not supported".to_string())),
        Yaml::BadValue => Err(YamlError("bad YAML value".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixture_style_documents() {
        let yaml = r#"
apiVersion: v1
kind: Secret
metadata:
  name: openstack-secret
---
apiVersion: keda.sh/v1alpha1
kind: ScaledObject
spec:
  pollingInterval: 10   # Optional. Default: 30 seconds
  triggers:
  - type: openstack-swift
    metadata:
      objectCount: "1"
"#;
        let docs = parse_yaml_multi(yaml).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["kind"], "Secret");
        assert_eq!(docs[1]["spec"]["pollingInterval"], 10);
        assert_eq!(docs[1]["spec"]["triggers"][0]["metadata"]["objectCount"], "1");
    }

    #[test]
    fn empty_documents_are_dropped() {
        let docs = parse_yaml_multi("---\nkind: Secret\n---\n").unwrap();
        assert_eq!(docs.len(), 1);
        assert!(parse_yaml_multi("").unwrap().is_empty());
    }

    #[test]
    fn single_document_of_empty_input_is_null() {
        assert_eq!(parse_yaml("").unwrap(), Value::Null);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(parse_yaml_multi("not: valid: yaml: {{").is_err());
    }

    #[test]
    fn join_inserts_separators_and_newlines() {
        let joined = join_documents(["a: 1", "b: 2\n"]);
        assert_eq!(joined, "a: 1\n---\nb: 2\n");
        assert_eq!(join_documents(Vec::<String>::new()), "");
    }

    #[test]
    fn rendered_documents_parse_back() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Doc {
            api_version: &'static str,
            min_replica_count: u32,
        }

        let rendered = to_yaml_document(&Doc {
            api_version: "v1",
            min_replica_count: 0,
        })
        .unwrap();
        let value = parse_yaml(&rendered).unwrap();
        assert_eq!(value["apiVersion"], "v1");
        assert_eq!(value["minReplicaCount"], 0);
    }
}
