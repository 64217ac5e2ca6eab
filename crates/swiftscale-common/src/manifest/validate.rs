//! Pre-flight validation of a bundle before it is handed to kubectl

use tracing::debug;

use super::{BundleNamespace, ManifestBundle};
use crate::trigger::{SwiftAuthParams, SwiftTriggerMetadata, SWIFT_TRIGGER_TYPE};
use crate::{Error, Result};

/// A bundle that passed validation, with its triggers parsed
#[derive(Clone, Debug)]
pub struct ValidatedBundle {
    /// Namespace shared by all resources; `None` when left to `kubectl -n`
    pub namespace: Option<String>,
    /// Parsed metadata of each openstack-swift trigger, in manifest order
    pub triggers: Vec<SwiftTriggerMetadata>,
    /// Credentials resolved through the TriggerAuthentication
    pub auth: SwiftAuthParams,
}

impl ManifestBundle {
    /// Check the bundle the way the operator would on admission.
    ///
    /// Cross-references (authenticationRef -> TriggerAuthentication ->
    /// Secret keys) are resolved locally, so the resolved credentials are
    /// validated too.
    pub fn validate(&self) -> Result<ValidatedBundle> {
        let so = &self.scaled_object;
        let so_ref = so.resource_ref();

        let namespace = match self.placement() {
            BundleNamespace::Shared(ns) => Some(ns.to_string()),
            BundleNamespace::Unset => None,
            BundleNamespace::Conflicting => {
                return Err(Error::validation_for_field(
                    &so_ref,
                    "metadata.namespace",
                    "Secret, TriggerAuthentication and ScaledObject must share a namespace",
                ))
            }
        };

        if let (Some(min), Some(max)) = (so.spec.min_replica_count, so.spec.max_replica_count) {
            if min > max {
                return Err(Error::validation_for_field(
                    &so_ref,
                    "spec.minReplicaCount",
                    format!("minReplicaCount {} exceeds maxReplicaCount {}", min, max),
                ));
            }
        }

        if so.spec.triggers.is_empty() {
            return Err(Error::validation_for_field(
                &so_ref,
                "spec.triggers",
                "at least one trigger is required",
            ));
        }

        let auth_params = self.trigger_auth.resolve_params(&self.secret)?;
        let auth = SwiftAuthParams::parse(&auth_params).map_err(|e| {
            rescope(e, &self.trigger_auth.resource_ref(), "spec.secretTargetRef")
        })?;

        let mut triggers = Vec::new();
        for (i, trigger) in so.spec.triggers.iter().enumerate() {
            let path = format!("spec.triggers[{}]", i);
            if trigger.type_ != SWIFT_TRIGGER_TYPE {
                debug!(trigger_type = %trigger.type_, "Skipping validation of non-swift trigger");
                continue;
            }

            let auth_ref = trigger.authentication_ref.as_ref().ok_or_else(|| {
                Error::validation_for_field(
                    &so_ref,
                    format!("{}.authenticationRef", path),
                    "openstack-swift triggers need an authenticationRef",
                )
            })?;
            if auth_ref.name != self.trigger_auth.metadata.name {
                return Err(Error::validation_for_field(
                    &so_ref,
                    format!("{}.authenticationRef.name", path),
                    format!("unknown TriggerAuthentication {}", auth_ref.name),
                ));
            }

            let meta = SwiftTriggerMetadata::parse(&trigger.metadata)
                .map_err(|e| rescope(e, &so_ref, &format!("{}.metadata", path)))?;
            triggers.push(meta);
        }

        if triggers.is_empty() {
            return Err(Error::validation_for_field(
                &so_ref,
                "spec.triggers",
                format!("no {} trigger found", SWIFT_TRIGGER_TYPE),
            ));
        }

        Ok(ValidatedBundle {
            namespace,
            triggers,
            auth,
        })
    }
}

/// Re-anchor a trigger-level validation error onto the manifest resource.
fn rescope(err: Error, resource: &str, prefix: &str) -> Error {
    match err {
        Error::Validation { message, field, .. } => Error::Validation {
            resource: resource.to_string(),
            message,
            field: Some(match field {
                Some(f) => format!("{}.{}", prefix, f),
                None => prefix.to_string(),
            }),
        },
        other => other,
    }
}
