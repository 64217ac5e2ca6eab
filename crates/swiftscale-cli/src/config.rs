//! Suite configuration.
//!
//! Resolution order (highest priority first):
//! 1. Command-line flags
//! 2. `SWIFTSCALE_*` environment variables (bound to the same flags)
//! 3. The JSON file passed with `--config`
//! 4. Built-in defaults, which reproduce the reference devstack fixture

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use swiftscale_common::manifest::SwiftFixture;
use swiftscale_common::DEFAULT_TEST_NAMESPACE;

use crate::commands::ClusterArgs;
use crate::{Error, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Configuration for a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct E2eConfig {
    /// Namespace passed to `kubectl -n` and written into the manifest
    pub namespace: String,
    /// Explicit kubeconfig; kubectl's own resolution applies when unset
    pub kubeconfig: Option<PathBuf>,
    /// kubectl binary
    pub kubectl: String,
    /// Delete the manifest in the after-always hook
    pub cleanup: bool,
    /// Upper bound on the whole suite
    pub timeout_secs: u64,
    /// Fixture values to override
    pub fixture: FixtureOverrides,
}

/// Optional replacements for the fixture's devstack values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureOverrides {
    pub scale_target: Option<String>,
    pub swift_url: Option<String>,
    pub container_name: Option<String>,
    pub object_count: Option<u32>,
    pub auth_url: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub project_id: Option<String>,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_TEST_NAMESPACE.to_string(),
            kubeconfig: None,
            kubectl: "kubectl".to_string(),
            cleanup: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fixture: FixtureOverrides::default(),
        }
    }
}

impl E2eConfig {
    /// Load from a JSON file, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::config(path, format!("failed to read: {}", e)))?;
        serde_json::from_str(&data).map_err(|e| Error::config(path, e.to_string()))
    }

    /// Load the file named by the flags, then apply the flags on top.
    pub fn resolve(args: &ClusterArgs) -> Result<Self> {
        let mut config = Self::load(args.config.as_deref())?;
        if let Some(ref ns) = args.namespace {
            config.namespace = ns.clone();
        }
        if let Some(ref kc) = args.kubeconfig {
            config.kubeconfig = Some(kc.clone());
        }
        if let Some(ref bin) = args.kubectl {
            config.kubectl = bin.clone();
        }
        Ok(config)
    }

    /// Suite timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fixture with the namespace and overrides applied
    pub fn fixture(&self) -> SwiftFixture {
        let o = &self.fixture;
        let mut fixture = SwiftFixture::default().with_namespace(&self.namespace);
        let strings = [
            (&o.scale_target, &mut fixture.scale_target),
            (&o.swift_url, &mut fixture.swift_url),
            (&o.container_name, &mut fixture.container_name),
            (&o.auth_url, &mut fixture.auth_url),
            (&o.user_id, &mut fixture.user_id),
            (&o.password, &mut fixture.password),
            (&o.project_id, &mut fixture.project_id),
        ];
        for (value, slot) in strings {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        if o.object_count.is_some() {
            fixture.object_count = o.object_count;
        }
        fixture
    }
}
