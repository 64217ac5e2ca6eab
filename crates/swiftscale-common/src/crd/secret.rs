//! Kubernetes Secret holding the OpenStack credentials

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use super::ObjectMeta;
use crate::kube_utils::HasApiResource;
use crate::{Error, Result};

/// Secret type used for the credential secret
pub const OPAQUE_SECRET_TYPE: &str = "Opaque";

/// Kubernetes Secret with base64-encoded `data`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Secret type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Base64-encoded values
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl HasApiResource for Secret {
    const API_VERSION: &'static str = "v1";
    const KIND: &'static str = "Secret";
}

impl Secret {
    /// Create an empty Opaque secret
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            api_version: Self::API_VERSION.to_string(),
            kind: Self::KIND.to_string(),
            metadata: ObjectMeta::new(name, namespace),
            type_: Some(OPAQUE_SECRET_TYPE.to_string()),
            data: BTreeMap::new(),
        }
    }

    /// Add a plaintext value, stored base64-encoded
    pub fn with_plain_data(mut self, key: impl Into<String>, value: impl AsRef<[u8]>) -> Self {
        self.data.insert(key.into(), STANDARD.encode(value));
        self
    }

    /// Decode a value back to UTF-8.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn decoded(&self, key: &str) -> Result<Option<String>> {
        let Some(encoded) = self.data.get(key) else {
            return Ok(None);
        };
        let field = format!("data.{}", key);
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
            Error::validation_for_field(
                self.resource_ref(),
                &field,
                format!("invalid base64: {}", e),
            )
        })?;
        String::from_utf8(bytes).map(Some).map_err(|e| {
            Error::validation_for_field(self.resource_ref(), &field, format!("not UTF-8: {}", e))
        })
    }

    /// `Secret/<name>`
    pub fn resource_ref(&self) -> String {
        <Self as HasApiResource>::resource_ref(&self.metadata.name)
    }
}
