//! End-to-end suite for the openstack-swift trigger
//!
//! before:       apply the manifest, fail unless kubectl exits 0
//! test:         the ScaledObject is visible through the API server
//! after.always: delete the manifest (unless `--keep`)

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use swiftscale_common::harness::Suite;
use swiftscale_common::kubectl::{CommandRunner, Kubectl};
use tracing::{info, warn};

use super::{kubectl_for, render::render, ClusterArgs};
use crate::config::E2eConfig;
use crate::{Error, Result};

/// Suite name used in the summary
pub const SUITE_NAME: &str = "openstack-swift";

/// Name of the single test body
pub const REGISTERED_TEST: &str = "scaled object is registered";

#[derive(Args, Debug)]
pub struct E2eArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Leave the resources in the cluster after the suite
    #[arg(long)]
    pub keep: bool,

    /// Abort the suite after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// What the suite applies and where
#[derive(Debug, Clone)]
pub struct SuitePlan {
    pub namespace: String,
    pub manifest: String,
    pub scaled_object: String,
    pub cleanup: bool,
}

impl SuitePlan {
    pub fn from_config(config: &E2eConfig) -> Result<Self> {
        let fixture = config.fixture();
        Ok(Self {
            namespace: config.namespace.clone(),
            manifest: render(config)?,
            scaled_object: fixture.scaled_object_name,
            cleanup: config.cleanup,
        })
    }
}

pub async fn run(args: E2eArgs) -> Result<()> {
    let mut config = E2eConfig::resolve(&args.cluster)?;
    if args.keep {
        config.cleanup = false;
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout_secs = secs;
    }

    let plan = SuitePlan::from_config(&config)?;
    run_suite(Arc::new(kubectl_for(&config)), plan, config.timeout()).await
}

/// Build the suite around a shared kubectl.
pub fn openstack_swift_suite<R>(kubectl: Arc<Kubectl<R>>, plan: SuitePlan) -> Suite
where
    R: CommandRunner + 'static,
{
    let SuitePlan {
        namespace,
        manifest,
        scaled_object,
        cleanup,
    } = plan;

    let before = {
        let (kubectl, namespace, manifest) = (kubectl.clone(), namespace.clone(), manifest.clone());
        move || async move { kubectl.apply_manifest(&namespace, &manifest).await }
    };

    let registered = {
        let (kubectl, namespace) = (kubectl.clone(), namespace.clone());
        move || async move {
            match kubectl.exists(&namespace, "scaledobject", &scaled_object).await {
                Ok(true) => Ok(()),
                Ok(false) => Err(swiftscale_common::Error::internal_with_context(
                    SUITE_NAME,
                    format!("ScaledObject {} not found in {}", scaled_object, namespace),
                )),
                Err(e) => Err(e),
            }
        }
    };

    let after = move || async move {
        if !cleanup {
            info!(namespace = %namespace, "Keeping resources");
            return Ok(());
        }
        kubectl.delete_manifest(&namespace, &manifest).await
    };

    Suite::new(SUITE_NAME)
        .before(before)
        .test(REGISTERED_TEST, registered)
        .after_always(after)
}

/// Run the suite under a timeout; on timeout the manifest is still deleted.
pub async fn run_suite<R>(kubectl: Arc<Kubectl<R>>, plan: SuitePlan, timeout: Duration) -> Result<()>
where
    R: CommandRunner + 'static,
{
    let fallback = plan.clone();
    let suite = openstack_swift_suite(kubectl.clone(), plan);

    match tokio::time::timeout(timeout, suite.run()).await {
        Ok(report) => Ok(report.finish()?),
        Err(_) => {
            warn!(timeout = ?timeout, "Suite timed out");
            if fallback.cleanup {
                if let Err(e) = kubectl
                    .delete_manifest(&fallback.namespace, &fallback.manifest)
                    .await
                {
                    warn!(error = %e, "Cleanup after timeout failed");
                }
            }
            Err(Error::Timeout(timeout))
        }
    }
}
