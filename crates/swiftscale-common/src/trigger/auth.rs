//! Trigger authentication parameters resolved from the TriggerAuthentication

use std::collections::BTreeMap;

use url::Url;

use super::{parse_http_url, SWIFT_TRIGGER_TYPE};
use crate::{Error, Result};

/// Keystone authentication method chosen by the supplied parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwiftAuthMethod {
    /// User/password scoped to a project
    Password {
        /// Keystone user ID
        user_id: String,
        /// User password
        password: String,
        /// Project the token is scoped to
        project_id: String,
    },
    /// Application credential
    AppCredential {
        /// Application credential ID
        id: String,
        /// Application credential secret
        secret: String,
    },
}

/// Parsed auth params for the `openstack-swift` trigger
#[derive(Clone, PartialEq, Eq)]
pub struct SwiftAuthParams {
    /// Keystone v3 endpoint
    pub auth_url: Url,
    /// Authentication method
    pub method: SwiftAuthMethod,
}

// Credentials stay out of logs.
impl std::fmt::Debug for SwiftAuthParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwiftAuthParams")
            .field("auth_url", &self.auth_url.as_str())
            .field("method", &self.method_name())
            .finish()
    }
}

impl SwiftAuthParams {
    /// Parse auth params as KEDA resolves them from a TriggerAuthentication.
    ///
    /// `userID` selects the password method; otherwise `appCredentialID`
    /// selects application credentials.
    pub fn parse(params: &BTreeMap<String, String>) -> Result<Self> {
        let auth_url = match non_empty(params, "authURL") {
            Some(raw) => parse_http_url("authURL", raw)?,
            None => return Err(missing("authURL")),
        };

        let method = if let Some(user_id) = non_empty(params, "userID") {
            SwiftAuthMethod::Password {
                user_id: user_id.to_string(),
                password: required(params, "password")?,
                project_id: required(params, "projectID")?,
            }
        } else if let Some(id) = non_empty(params, "appCredentialID") {
            SwiftAuthMethod::AppCredential {
                id: id.to_string(),
                secret: required(params, "appCredentialSecret")?,
            }
        } else {
            return Err(Error::validation_for(
                SWIFT_TRIGGER_TYPE,
                "neither userID or appCredentialID exist in the authParams",
            ));
        };

        Ok(Self { auth_url, method })
    }

    /// Name of the chosen method, as Keystone spells it
    pub fn method_name(&self) -> &'static str {
        match self.method {
            SwiftAuthMethod::Password { .. } => "password",
            SwiftAuthMethod::AppCredential { .. } => "application_credential",
        }
    }
}

fn non_empty<'a>(params: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

fn required(params: &BTreeMap<String, String>, key: &str) -> Result<String> {
    non_empty(params, key)
        .map(str::to_string)
        .ok_or_else(|| missing(key))
}

fn missing(key: &str) -> Error {
    Error::validation_for_field(
        SWIFT_TRIGGER_TYPE,
        key,
        format!("{} doesn't exist in the authParams", key),
    )
}
