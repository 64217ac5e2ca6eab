//! Local validation of `openstack-swift` trigger metadata and credentials
//!
//! Mirrors the checks KEDA's scaler applies when a ScaledObject is admitted,
//! so a malformed fixture fails before it reaches the cluster. Nothing here
//! talks to Swift or Keystone.

mod auth;
mod metadata;

pub use auth::{SwiftAuthMethod, SwiftAuthParams};
pub use metadata::{normalize_metric_name, SwiftTriggerMetadata, DEFAULT_OBJECT_COUNT};

use url::Url;

use crate::{Error, Result};

/// Trigger `type` handled by this module
pub const SWIFT_TRIGGER_TYPE: &str = "openstack-swift";

/// Parse an absolute http(s) URL, reporting failures against `field`.
fn parse_http_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        Error::validation_for_field(
            SWIFT_TRIGGER_TYPE,
            field,
            format!("the {} is invalid: {}", field, e),
        )
    })?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        scheme => Err(Error::validation_for_field(
            SWIFT_TRIGGER_TYPE,
            field,
            format!("the {} must be an http(s) URL, got scheme {}", field, scheme),
        )),
    }
}
