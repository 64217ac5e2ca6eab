//! Trigger metadata (`spec.triggers[].metadata`)

use std::collections::BTreeMap;

use url::Url;

use super::{parse_http_url, SWIFT_TRIGGER_TYPE};
use crate::{Error, Result};

/// Objects per replica when `objectCount` is omitted
pub const DEFAULT_OBJECT_COUNT: u32 = 5;

/// Parsed `openstack-swift` trigger metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwiftTriggerMetadata {
    /// Swift account endpoint
    pub swift_url: Url,
    /// Container whose object count drives scaling
    pub container_name: String,
    /// Target object count per replica
    pub object_count: u32,
    /// Only count objects with this prefix
    pub object_prefix: Option<String>,
    /// Delimiter for pseudo-directory listing
    pub object_delimiter: Option<String>,
    /// Page size when listing objects
    pub object_limit: Option<u32>,
    /// HTTP timeout for Swift requests, in seconds
    pub timeout_secs: Option<u64>,
    /// Skip pseudo-directory entries when counting
    pub only_files: bool,
}

impl SwiftTriggerMetadata {
    /// Parse trigger metadata as KEDA receives it.
    pub fn parse(metadata: &BTreeMap<String, String>) -> Result<Self> {
        let swift_url = match metadata.get("swiftURL") {
            Some(raw) => parse_http_url("swiftURL", raw)?,
            None => return Err(missing("swiftURL")),
        };

        let container_name = match metadata.get("containerName") {
            Some(name) if !name.trim().is_empty() => name.clone(),
            Some(_) => {
                return Err(invalid("containerName", "containerName must not be empty"))
            }
            None => return Err(missing("containerName")),
        };

        let object_count = match metadata.get("objectCount") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                invalid("objectCount", format!("objectCount parsing error: {}", e))
            })?,
            None => DEFAULT_OBJECT_COUNT,
        };

        let object_limit = match metadata.get("objectLimit") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => return Err(invalid("objectLimit", "objectLimit must be positive")),
                Ok(limit) => Some(limit),
                Err(e) => {
                    return Err(invalid(
                        "objectLimit",
                        format!("objectLimit parsing error: {}", e),
                    ))
                }
            },
            None => None,
        };

        let timeout_secs = metadata
            .get("timeout")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| invalid("timeout", format!("timeout parsing error: {}", e)))
            })
            .transpose()?;

        let only_files = match metadata.get("onlyFiles").map(String::as_str) {
            None => false,
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                return Err(invalid(
                    "onlyFiles",
                    format!("onlyFiles must be true or false, got {}", other),
                ))
            }
        };

        Ok(Self {
            swift_url,
            container_name,
            object_count,
            object_prefix: metadata.get("objectPrefix").cloned(),
            object_delimiter: metadata.get("objectDelimiter").cloned(),
            object_limit,
            timeout_secs,
            only_files,
        })
    }

    /// External metric name KEDA registers for this trigger.
    pub fn metric_name(&self) -> String {
        normalize_metric_name(&format!("swift-container-{}", self.container_name))
    }

    /// URL of the container itself (`<swiftURL>/<containerName>`)
    pub fn container_url(&self) -> Result<Url> {
        let mut url = self.swift_url.clone();
        url.path_segments_mut()
            .map_err(|_| invalid("swiftURL", "swiftURL cannot be a base URL"))?
            .pop_if_empty()
            .push(&self.container_name);
        Ok(url)
    }
}

/// Replace characters the metrics API rejects in metric names.
pub fn normalize_metric_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '.' | ':' | '%' => '-',
            c => c,
        })
        .collect()
}

fn missing(field: &str) -> Error {
    Error::validation_for_field(SWIFT_TRIGGER_TYPE, field, format!("no {} given", field))
}

fn invalid(field: &str, msg: impl Into<String>) -> Error {
    Error::validation_for_field(SWIFT_TRIGGER_TYPE, field, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SWIFT_URL: &str = "http://localhost:8080/v1/my-account-id";

    fn meta(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn required_fields_only_uses_defaults() {
        let parsed = SwiftTriggerMetadata::parse(&meta(&[
            ("swiftURL", SWIFT_URL),
            ("containerName", "my-container"),
        ]))
        .unwrap();
        assert_eq!(parsed.container_name, "my-container");
        assert_eq!(parsed.object_count, DEFAULT_OBJECT_COUNT);
        assert_eq!(parsed.object_count, 5);
        assert!(!parsed.only_files);
        assert_eq!(parsed.object_limit, None);
        assert_eq!(parsed.timeout_secs, None);
    }

    #[test]
    fn optional_fields_are_read() {
        let parsed = SwiftTriggerMetadata::parse(&meta(&[
            ("swiftURL", SWIFT_URL),
            ("containerName", "my-container"),
            ("objectCount", "1"),
            ("objectPrefix", "my-prefix"),
            ("objectDelimiter", "/"),
            ("objectLimit", "1000"),
            ("timeout", "2"),
            ("onlyFiles", "true"),
        ]))
        .unwrap();
        assert_eq!(parsed.object_count, 1);
        assert_eq!(parsed.object_prefix.as_deref(), Some("my-prefix"));
        assert_eq!(parsed.object_delimiter.as_deref(), Some("/"));
        assert_eq!(parsed.object_limit, Some(1000));
        assert_eq!(parsed.timeout_secs, Some(2));
        assert!(parsed.only_files);
    }

    #[rstest]
    #[case::missing_swift_url(&[("containerName", "my-container")], "swiftURL")]
    #[case::missing_container_name(&[("swiftURL", SWIFT_URL), ("objectCount", "5")], "containerName")]
    #[case::empty_container_name(&[("swiftURL", SWIFT_URL), ("containerName", " ")], "containerName")]
    #[case::fractional_object_count(&[("swiftURL", SWIFT_URL), ("containerName", "c"), ("objectCount", "5.5")], "objectCount")]
    #[case::negative_object_count(&[("swiftURL", SWIFT_URL), ("containerName", "c"), ("objectCount", "-1")], "objectCount")]
    #[case::fractional_timeout(&[("swiftURL", SWIFT_URL), ("containerName", "c"), ("timeout", "2.5")], "timeout")]
    #[case::zero_object_limit(&[("swiftURL", SWIFT_URL), ("containerName", "c"), ("objectLimit", "0")], "objectLimit")]
    #[case::non_boolean_only_files(&[("swiftURL", SWIFT_URL), ("containerName", "c"), ("onlyFiles", "yes")], "onlyFiles")]
    #[case::relative_swift_url(&[("swiftURL", "v1/AUTH_x"), ("containerName", "c")], "swiftURL")]
    #[case::non_http_swift_url(&[("swiftURL", "ftp://host/v1"), ("containerName", "c")], "swiftURL")]
    fn invalid_metadata_is_rejected(#[case] pairs: &[(&str, &str)], #[case] field: &str) {
        let err = SwiftTriggerMetadata::parse(&meta(pairs)).unwrap_err();
        assert_eq!(err.field(), Some(field), "unexpected error: {}", err);
    }

    #[test]
    fn metric_name_is_prefixed_with_swift_container() {
        let parsed = SwiftTriggerMetadata::parse(&meta(&[
            ("swiftURL", SWIFT_URL),
            ("containerName", "my-container"),
        ]))
        .unwrap();
        assert_eq!(parsed.metric_name(), "swift-container-my-container");
    }

    #[test]
    fn metric_names_are_normalized() {
        assert_eq!(
            normalize_metric_name("swift-container-a/b.c:d%e"),
            "swift-container-a-b-c-d-e"
        );
    }

    #[test]
    fn container_url_appends_the_container() {
        let parsed = SwiftTriggerMetadata::parse(&meta(&[
            (
                "swiftURL",
                "http://10.100.26.100:8080/v1/AUTH_b161dc518cd24bda84d94d9a0e73fc87/",
            ),
            ("containerName", "my-container"),
        ]))
        .unwrap();
        assert_eq!(
            parsed.container_url().unwrap().as_str(),
            "http://10.100.26.100:8080/v1/AUTH_b161dc518cd24bda84d94d9a0e73fc87/my-container"
        );
    }
}
