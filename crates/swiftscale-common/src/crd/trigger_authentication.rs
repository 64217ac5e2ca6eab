//! KEDA TriggerAuthentication binding trigger parameters to Secret keys

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ObjectMeta, Secret};
use crate::kube_utils::HasApiResource;
use crate::{Error, Result, KEDA_API_VERSION};

/// KEDA TriggerAuthentication
///
/// Example:
/// ```yaml
/// apiVersion: keda.sh/v1alpha1
/// kind: TriggerAuthentication
/// metadata:
///   name: keda-trigger-auth-openstack-secret
/// spec:
///   secretTargetRef:
///   - parameter: userID
///     name: openstack-secret
///     key: userID
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAuthentication {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: TriggerAuthenticationSpec,
}

impl HasApiResource for TriggerAuthentication {
    const API_VERSION: &'static str = KEDA_API_VERSION;
    const KIND: &'static str = "TriggerAuthentication";
}

/// TriggerAuthentication spec
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAuthenticationSpec {
    /// Parameters resolved from Secret keys
    #[serde(default)]
    pub secret_target_ref: Vec<SecretTargetRef>,
}

/// One trigger parameter sourced from a Secret key
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretTargetRef {
    /// Trigger parameter name (e.g. "userID")
    pub parameter: String,
    /// Secret name
    pub name: String,
    /// Key within the Secret
    pub key: String,
}

impl TriggerAuthentication {
    /// Create a TriggerAuthentication with no parameters
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            api_version: Self::API_VERSION.to_string(),
            kind: Self::KIND.to_string(),
            metadata: ObjectMeta::new(name, namespace),
            spec: TriggerAuthenticationSpec::default(),
        }
    }

    /// Map `parameter` to `key` of the named secret
    pub fn with_secret_param(
        mut self,
        parameter: impl Into<String>,
        secret: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.spec.secret_target_ref.push(SecretTargetRef {
            parameter: parameter.into(),
            name: secret.into(),
            key: key.into(),
        });
        self
    }

    /// Resolve every parameter against `secret`.
    ///
    /// Each ref must name this secret and an existing key. This is what KEDA
    /// hands the scaler as its auth params.
    pub fn resolve_params(&self, secret: &Secret) -> Result<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        for (i, target) in self.spec.secret_target_ref.iter().enumerate() {
            let field = format!("spec.secretTargetRef[{}]", i);
            if target.name != secret.metadata.name {
                return Err(Error::validation_for_field(
                    self.resource_ref(),
                    format!("{}.name", field),
                    format!(
                        "parameter {} references unknown secret {}",
                        target.parameter, target.name
                    ),
                ));
            }
            let value = secret.decoded(&target.key)?.ok_or_else(|| {
                Error::validation_for_field(
                    self.resource_ref(),
                    format!("{}.key", field),
                    format!("secret {} has no key {}", target.name, target.key),
                )
            })?;
            params.insert(target.parameter.clone(), value);
        }
        Ok(params)
    }

    /// `TriggerAuthentication/<name>`
    pub fn resource_ref(&self) -> String {
        <Self as HasApiResource>::resource_ref(&self.metadata.name)
    }
}
