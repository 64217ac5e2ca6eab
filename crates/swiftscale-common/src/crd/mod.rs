//! Resource types for the Swift trigger fixture
//!
//! Plain serde structs rather than generated CRD bindings: the harness never
//! talks to the API server directly, it renders these and hands them to kubectl.

mod scaled_object;
mod secret;
mod trigger_authentication;
mod types;

pub use scaled_object::{
    AuthenticationRef, ScaleTargetRef, ScaledObject, ScaledObjectSpec, ScaledObjectTrigger,
    DEFAULT_COOLDOWN_PERIOD_SECS, DEFAULT_POLLING_INTERVAL_SECS,
};
pub use secret::{Secret, OPAQUE_SECRET_TYPE};
pub use trigger_authentication::{
    SecretTargetRef, TriggerAuthentication, TriggerAuthenticationSpec,
};
pub use types::ObjectMeta;
