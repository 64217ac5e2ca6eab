//! The three-document manifest the suite applies
//!
//! A bundle is always exactly one Secret, one TriggerAuthentication and one
//! ScaledObject. Rendering keeps that order so kubectl creates the Secret
//! before anything that references it.

mod fixture;
mod validate;

pub use fixture::SwiftFixture;
pub use validate::ValidatedBundle;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::crd::{ScaledObject, Secret, TriggerAuthentication};
use crate::kube_utils::{expect_api_version, type_meta, HasApiResource};
use crate::yaml::{join_documents, parse_yaml_multi, to_yaml_document};
use crate::{Error, Result};

/// Secret, TriggerAuthentication and ScaledObject applied together
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestBundle {
    /// Credential secret
    pub secret: Secret,
    /// Binding of trigger parameters to the secret
    pub trigger_auth: TriggerAuthentication,
    /// Scaling policy carrying the openstack-swift trigger
    pub scaled_object: ScaledObject,
}

impl ManifestBundle {
    /// Render as a multi-document YAML manifest.
    pub fn to_yaml(&self) -> Result<String> {
        let docs = [
            render::<Secret>(&self.secret)?,
            render::<TriggerAuthentication>(&self.trigger_auth)?,
            render::<ScaledObject>(&self.scaled_object)?,
        ];
        Ok(join_documents(docs))
    }

    /// Parse a multi-document manifest.
    ///
    /// Every document must be one of the three bundle kinds, each kind must
    /// appear exactly once.
    pub fn from_yaml(input: &str) -> Result<Self> {
        let mut secret = None;
        let mut trigger_auth = None;
        let mut scaled_object = None;

        for doc in parse_yaml_multi(input)? {
            let kind = type_meta(&doc)?.1.to_string();
            debug!(kind = %kind, "Parsing manifest document");
            match kind.as_str() {
                k if k == Secret::KIND => set_once(&mut secret, decode::<Secret>(doc)?)?,
                k if k == TriggerAuthentication::KIND => {
                    set_once(&mut trigger_auth, decode::<TriggerAuthentication>(doc)?)?
                }
                k if k == ScaledObject::KIND => {
                    set_once(&mut scaled_object, decode::<ScaledObject>(doc)?)?
                }
                other => {
                    return Err(Error::serialization_for_kind(
                        other,
                        format!("unexpected kind {} in manifest", other),
                    ))
                }
            }
        }

        Ok(Self {
            secret: secret.ok_or_else(|| missing_kind(Secret::KIND))?,
            trigger_auth: trigger_auth.ok_or_else(|| missing_kind(TriggerAuthentication::KIND))?,
            scaled_object: scaled_object.ok_or_else(|| missing_kind(ScaledObject::KIND))?,
        })
    }

    /// Set the namespace on all three resources.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        for meta in [
            &mut self.secret.metadata,
            &mut self.trigger_auth.metadata,
            &mut self.scaled_object.metadata,
        ] {
            meta.namespace = Some(namespace.to_string());
        }
        self
    }

    /// How the resources place themselves across namespaces.
    pub fn placement(&self) -> BundleNamespace<'_> {
        let ns = self.secret.metadata.namespace.as_deref();
        let agree = self.trigger_auth.metadata.namespace.as_deref() == ns
            && self.scaled_object.metadata.namespace.as_deref() == ns;
        match (agree, ns) {
            (false, _) => BundleNamespace::Conflicting,
            (true, None) => BundleNamespace::Unset,
            (true, Some(ns)) => BundleNamespace::Shared(ns),
        }
    }

    /// Namespace written into every resource, if there is one.
    pub fn namespace(&self) -> Option<&str> {
        match self.placement() {
            BundleNamespace::Shared(ns) => Some(ns),
            _ => None,
        }
    }
}

/// Namespace placement of a bundle's resources
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BundleNamespace<'a> {
    /// No resource sets `metadata.namespace`; kubectl's `-n` decides
    Unset,
    /// Every resource names the same namespace
    Shared(&'a str),
    /// The resources disagree
    Conflicting,
}

fn render<K: HasApiResource + serde::Serialize>(resource: &K) -> Result<String> {
    to_yaml_document(resource).map_err(|e| Error::serialization_for_kind(K::KIND, e.to_string()))
}

fn decode<K: HasApiResource + DeserializeOwned>(doc: Value) -> Result<K> {
    expect_api_version::<K>(&doc)?;
    serde_json::from_value(doc).map_err(|e| Error::serialization_for_kind(K::KIND, e.to_string()))
}

fn set_once<K: HasApiResource>(slot: &mut Option<K>, value: K) -> Result<()> {
    if slot.is_some() {
        return Err(Error::serialization_for_kind(
            K::KIND,
            format!("manifest contains more than one {}", K::KIND),
        ));
    }
    *slot = Some(value);
    Ok(())
}

fn missing_kind(kind: &str) -> Error {
    Error::serialization_for_kind(kind, format!("manifest has no {}", kind))
}
