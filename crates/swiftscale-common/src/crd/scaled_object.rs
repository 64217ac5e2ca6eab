//! KEDA ScaledObject carrying the openstack-swift trigger

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ObjectMeta;
use crate::kube_utils::HasApiResource;
use crate::KEDA_API_VERSION;

/// KEDA's polling interval when `pollingInterval` is omitted
pub const DEFAULT_POLLING_INTERVAL_SECS: u32 = 30;

/// KEDA's cooldown period when `cooldownPeriod` is omitted
pub const DEFAULT_COOLDOWN_PERIOD_SECS: u32 = 300;

/// KEDA ScaledObject
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScaledObject {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: ScaledObjectSpec,
}

impl HasApiResource for ScaledObject {
    const API_VERSION: &'static str = KEDA_API_VERSION;
    const KIND: &'static str = "ScaledObject";
}

/// ScaledObject spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScaledObjectSpec {
    /// Workload to scale
    pub scale_target_ref: ScaleTargetRef,
    /// Seconds between trigger checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_interval: Option<u32>,
    /// Seconds to wait after the last active trigger before scaling to zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_period: Option<u32>,
    /// Minimum replica count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replica_count: Option<u32>,
    /// Maximum replica count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_replica_count: Option<u32>,
    /// Scaling triggers
    #[serde(default)]
    pub triggers: Vec<ScaledObjectTrigger>,
}

/// Scale target reference
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTargetRef {
    /// Target name (a Deployment unless `kind` says otherwise)
    pub name: String,
    /// API version of the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Kind of the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A single KEDA trigger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScaledObjectTrigger {
    /// Trigger type (e.g. "openstack-swift")
    #[serde(rename = "type")]
    pub type_: String,
    /// Trigger-specific key-value metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// TriggerAuthentication supplying the credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_ref: Option<AuthenticationRef>,
}

/// Reference to a TriggerAuthentication in the same namespace
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticationRef {
    /// TriggerAuthentication name
    pub name: String,
}

impl ScaledObjectSpec {
    /// Polling interval with KEDA's default applied
    pub fn effective_polling_interval(&self) -> Duration {
        Duration::from_secs(
            self.polling_interval
                .unwrap_or(DEFAULT_POLLING_INTERVAL_SECS)
                .into(),
        )
    }

    /// Cooldown period with KEDA's default applied
    pub fn effective_cooldown_period(&self) -> Duration {
        Duration::from_secs(
            self.cooldown_period
                .unwrap_or(DEFAULT_COOLDOWN_PERIOD_SECS)
                .into(),
        )
    }
}

impl ScaledObject {
    /// Create a ScaledObject targeting a Deployment, with no triggers
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            api_version: Self::API_VERSION.to_string(),
            kind: Self::KIND.to_string(),
            metadata: ObjectMeta::new(name, namespace),
            spec: ScaledObjectSpec {
                scale_target_ref: ScaleTargetRef {
                    name: target.into(),
                    api_version: None,
                    kind: None,
                },
                polling_interval: None,
                cooldown_period: None,
                min_replica_count: None,
                max_replica_count: None,
                triggers: Vec::new(),
            },
        }
    }

    /// `ScaledObject/<name>`
    pub fn resource_ref(&self) -> String {
        <Self as HasApiResource>::resource_ref(&self.metadata.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_intervals_fall_back_to_keda_defaults() {
        let so = ScaledObject::new("swift-scaledobject", "default", "hello-node");
        assert_eq!(so.spec.effective_polling_interval(), Duration::from_secs(30));
        assert_eq!(so.spec.effective_cooldown_period(), Duration::from_secs(300));
    }

    #[test]
    fn explicit_intervals_win() {
        let mut so = ScaledObject::new("swift-scaledobject", "default", "hello-node");
        so.spec.polling_interval = Some(10);
        so.spec.cooldown_period = Some(10);
        assert_eq!(so.spec.effective_polling_interval(), Duration::from_secs(10));
        assert_eq!(so.spec.effective_cooldown_period(), Duration::from_secs(10));
    }

    #[test]
    fn omitted_fields_are_not_serialized() {
        let so = ScaledObject::new("swift-scaledobject", "default", "hello-node");
        let value = serde_json::to_value(&so).unwrap();
        let spec = value["spec"].as_object().unwrap();
        assert!(!spec.contains_key("pollingInterval"));
        assert!(!spec.contains_key("cooldownPeriod"));
        assert_eq!(value["spec"]["scaleTargetRef"]["name"], "hello-node");
    }

    #[test]
    fn trigger_deserializes_from_manifest_shape() {
        let yaml = r#"
type: openstack-swift
metadata:
  swiftURL: http://10.100.26.100:8080/v1/AUTH_b161dc518cd24bda84d94d9a0e73fc87
  containerName: my-container
  objectCount: "1"
authenticationRef:
    name: keda-trigger-auth-openstack-secret
"#;
        let value = crate::yaml::parse_yaml(yaml).unwrap();
        let trigger: ScaledObjectTrigger = serde_json::from_value(value).unwrap();
        assert_eq!(trigger.type_, "openstack-swift");
        assert_eq!(trigger.metadata["containerName"], "my-container");
        assert_eq!(
            trigger.authentication_ref.map(|r| r.name).as_deref(),
            Some("keda-trigger-auth-openstack-secret")
        );
    }
}
