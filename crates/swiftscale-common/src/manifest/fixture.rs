//! Fixture values for the openstack-swift suite

use std::collections::BTreeMap;

use crate::crd::{
    AuthenticationRef, ScaledObject, ScaledObjectTrigger, Secret, TriggerAuthentication,
};
use crate::trigger::SWIFT_TRIGGER_TYPE;
use crate::DEFAULT_TEST_NAMESPACE;

use super::ManifestBundle;

/// Credential keys, used both as Secret keys and as trigger parameter names
const CREDENTIAL_KEYS: [&str; 4] = ["userID", "password", "projectID", "authURL"];

/// Everything that varies between runs of the suite.
///
/// Defaults reproduce the devstack environment the suite was written against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwiftFixture {
    /// Namespace for all three resources
    pub namespace: String,
    /// Secret name
    pub secret_name: String,
    /// TriggerAuthentication name
    pub trigger_auth_name: String,
    /// ScaledObject name
    pub scaled_object_name: String,
    /// Deployment to scale
    pub scale_target: String,
    /// `pollingInterval`, omitted when `None`
    pub polling_interval: Option<u32>,
    /// `cooldownPeriod`, omitted when `None`
    pub cooldown_period: Option<u32>,
    /// `minReplicaCount`, omitted when `None`
    pub min_replica_count: Option<u32>,
    /// Swift account endpoint
    pub swift_url: String,
    /// Container to watch
    pub container_name: String,
    /// `objectCount`, omitted when `None`
    pub object_count: Option<u32>,
    /// Keystone user ID
    pub user_id: String,
    /// Keystone password
    pub password: String,
    /// Keystone project ID
    pub project_id: String,
    /// Keystone endpoint
    pub auth_url: String,
}

impl Default for SwiftFixture {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_TEST_NAMESPACE.to_string(),
            secret_name: "openstack-secret".to_string(),
            trigger_auth_name: "keda-trigger-auth-openstack-secret".to_string(),
            scaled_object_name: "swift-scaledobject".to_string(),
            scale_target: "hello-node".to_string(),
            polling_interval: Some(10),
            cooldown_period: Some(10),
            min_replica_count: Some(0),
            swift_url: "http://10.100.26.100:8080/v1/AUTH_b161dc518cd24bda84d94d9a0e73fc87"
                .to_string(),
            container_name: "my-container".to_string(),
            object_count: Some(1),
            user_id: "1f0c2781b4114d13a44b8898f85340be".to_string(),
            password: "adminPass".to_string(),
            project_id: "b161dc518cd24bda84d94d9a0e73fc87".to_string(),
            auth_url: "http://10.100.26.100:5000/v3/".to_string(),
        }
    }
}

impl SwiftFixture {
    /// Use a different namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Watch a different container
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container_name = container.into();
        self
    }

    /// Build the Secret, TriggerAuthentication and ScaledObject.
    pub fn build(&self) -> ManifestBundle {
        let credentials = [
            &self.user_id,
            &self.password,
            &self.project_id,
            &self.auth_url,
        ];

        let secret = CREDENTIAL_KEYS
            .iter()
            .zip(credentials)
            .fold(Secret::new(&self.secret_name, &self.namespace), |s, (k, v)| {
                s.with_plain_data(*k, v)
            });

        let trigger_auth = CREDENTIAL_KEYS.iter().fold(
            TriggerAuthentication::new(&self.trigger_auth_name, &self.namespace),
            |auth, key| auth.with_secret_param(*key, &self.secret_name, *key),
        );

        let mut metadata = BTreeMap::from([
            ("swiftURL".to_string(), self.swift_url.clone()),
            ("containerName".to_string(), self.container_name.clone()),
        ]);
        if let Some(count) = self.object_count {
            metadata.insert("objectCount".to_string(), count.to_string());
        }

        let mut scaled_object =
            ScaledObject::new(&self.scaled_object_name, &self.namespace, &self.scale_target);
        scaled_object.spec.polling_interval = self.polling_interval;
        scaled_object.spec.cooldown_period = self.cooldown_period;
        scaled_object.spec.min_replica_count = self.min_replica_count;
        scaled_object.spec.triggers.push(ScaledObjectTrigger {
            type_: SWIFT_TRIGGER_TYPE.to_string(),
            metadata,
            authentication_ref: Some(AuthenticationRef {
                name: self.trigger_auth_name.clone(),
            }),
        });

        ManifestBundle {
            secret,
            trigger_auth,
            scaled_object,
        }
    }
}
