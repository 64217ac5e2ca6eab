//! Common types for swiftscale: resources, manifests, kubectl plumbing and the suite harness

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod harness;
pub mod kube_utils;
pub mod kubectl;
pub mod manifest;
pub mod trigger;
pub mod yaml;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace the end-to-end suite deploys into unless overridden
pub const DEFAULT_TEST_NAMESPACE: &str = "kedopenstack";

/// API version shared by every KEDA resource in the fixture
pub const KEDA_API_VERSION: &str = "keda.sh/v1alpha1";
