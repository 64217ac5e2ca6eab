//! Kubernetes resource helpers shared by the manifest types

use serde_json::Value;

use crate::{Error, Result};

/// Types that map to a fixed Kubernetes apiVersion/kind pair.
pub trait HasApiResource {
    /// Full API version (e.g., "keda.sh/v1alpha1", "v1")
    const API_VERSION: &'static str;
    /// Resource kind (e.g., "ScaledObject")
    const KIND: &'static str;

    /// `Kind/name` reference used in log lines and error messages.
    fn resource_ref(name: &str) -> String {
        format!("{}/{}", Self::KIND, name)
    }
}

/// Read `apiVersion` and `kind` from a parsed document.
///
/// Both must be present strings; anything else is a serialization error.
pub fn type_meta(doc: &Value) -> Result<(&str, &str)> {
    let kind = doc
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::serialization("document has no kind"))?;
    let api_version = doc
        .get("apiVersion")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::serialization_for_kind(kind, "document has no apiVersion"))?;
    Ok((api_version, kind))
}

/// Check that a document's apiVersion matches the type it is decoded into.
pub fn expect_api_version<K: HasApiResource>(doc: &Value) -> Result<()> {
    let (api_version, _) = type_meta(doc)?;
    if api_version != K::API_VERSION {
        return Err(Error::serialization_for_kind(
            K::KIND,
            format!(
                "unsupported apiVersion {}, expected {}",
                api_version,
                K::API_VERSION
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fake;

    impl HasApiResource for Fake {
        const API_VERSION: &'static str = "keda.sh/v1alpha1";
        const KIND: &'static str = "ScaledObject";
    }

    #[test]
    fn resource_ref_joins_kind_and_name() {
        assert_eq!(Fake::resource_ref("swift"), "ScaledObject/swift");
    }

    #[test]
    fn type_meta_reads_both_fields() {
        let doc = json!({"apiVersion": "v1", "kind": "Secret"});
        assert_eq!(type_meta(&doc).unwrap(), ("v1", "Secret"));
    }

    #[test]
    fn missing_kind_is_rejected() {
        let doc = json!({"apiVersion": "v1"});
        assert!(type_meta(&doc).is_err());
    }

    #[test]
    fn missing_api_version_is_rejected() {
        let doc = json!({"kind": "Secret"});
        let err = type_meta(&doc).unwrap_err();
        assert!(err.to_string().contains("apiVersion"));
    }

    #[test]
    fn mismatched_api_version_is_rejected() {
        let doc = json!({"apiVersion": "keda.sh/v1beta9", "kind": "ScaledObject"});
        let err = expect_api_version::<Fake>(&doc).unwrap_err();
        assert!(err.to_string().contains("expected keda.sh/v1alpha1"));
        assert!(expect_api_version::<Fake>(
            &json!({"apiVersion": "keda.sh/v1alpha1", "kind": "ScaledObject"})
        )
        .is_ok());
    }
}
