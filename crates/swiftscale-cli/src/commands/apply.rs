//! Apply and delete commands

use std::path::PathBuf;

use clap::Args;
use swiftscale_common::kubectl::{CommandRunner, Kubectl};
use tracing::{info, warn};

use super::{kubectl_for, read_manifest, ClusterArgs};
use crate::config::E2eConfig;
use crate::Result;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Manifest file to use instead of the generated fixture
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Send the file to kubectl as-is, without local parsing or validation
    #[arg(long, requires = "file")]
    pub skip_validation: bool,
}

pub async fn run_apply(args: ApplyArgs) -> Result<()> {
    let config = E2eConfig::resolve(&args.cluster)?;
    let manifest = prepare(&args, &config)?;
    apply(&kubectl_for(&config), &config.namespace, &manifest).await
}

pub async fn run_delete(args: ApplyArgs) -> Result<()> {
    let config = E2eConfig::resolve(&args.cluster)?;
    let manifest = prepare(&args, &config)?;
    delete(&kubectl_for(&config), &config.namespace, &manifest).await
}

/// Produce the manifest text for the configured namespace.
///
/// Parsed manifests are rewritten into the target namespace so kubectl does
/// not reject them for disagreeing with `-n`.
pub fn prepare(args: &ApplyArgs, config: &E2eConfig) -> Result<String> {
    match args.file {
        Some(ref path) if args.skip_validation => {
            warn!(path = %path.display(), "Skipping local validation");
            Ok(std::fs::read_to_string(path)?)
        }
        Some(ref path) => {
            let bundle = read_manifest(path)?.with_namespace(&config.namespace);
            bundle.validate()?;
            Ok(bundle.to_yaml()?)
        }
        None => super::render::render(config),
    }
}

pub async fn apply<R: CommandRunner>(
    kubectl: &Kubectl<R>,
    namespace: &str,
    manifest: &str,
) -> Result<()> {
    info!(namespace = %namespace, "Applying openstack-swift manifest");
    kubectl.apply_manifest(namespace, manifest).await?;
    Ok(())
}

pub async fn delete<R: CommandRunner>(
    kubectl: &Kubectl<R>,
    namespace: &str,
    manifest: &str,
) -> Result<()> {
    info!(namespace = %namespace, "Deleting openstack-swift manifest");
    kubectl.delete_manifest(namespace, manifest).await?;
    Ok(())
}
