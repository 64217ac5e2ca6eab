//! CLI commands

use std::path::{Path, PathBuf};

use clap::Args;
use swiftscale_common::kubectl::{Kubectl, KubectlRunner};
use swiftscale_common::manifest::ManifestBundle;
use tracing::debug;

use crate::config::E2eConfig;
use crate::Result;

pub mod apply;
pub mod e2e;
pub mod render;
pub mod validate;

/// Flags shared by every command that builds or applies the fixture.
#[derive(Args, Debug, Clone, Default)]
pub struct ClusterArgs {
    /// JSON config file
    #[arg(long, env = "SWIFTSCALE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Namespace to deploy into
    #[arg(short, long, env = "SWIFTSCALE_NAMESPACE")]
    pub namespace: Option<String>,

    /// Kubeconfig passed to kubectl
    #[arg(long, env = "SWIFTSCALE_KUBECONFIG")]
    pub kubeconfig: Option<PathBuf>,

    /// kubectl binary
    #[arg(long, env = "SWIFTSCALE_KUBECTL")]
    pub kubectl: Option<String>,
}

/// kubectl wired to the configured binary and kubeconfig
pub fn kubectl_for(config: &E2eConfig) -> Kubectl<KubectlRunner> {
    Kubectl::with_runner(
        KubectlRunner::new(&config.kubectl).with_kubeconfig(config.kubeconfig.clone()),
    )
}

/// Read and parse a manifest file.
pub fn read_manifest(path: &Path) -> Result<ManifestBundle> {
    debug!(path = %path.display(), "Reading manifest");
    let contents = std::fs::read_to_string(path)?;
    Ok(ManifestBundle::from_yaml(&contents)?)
}
