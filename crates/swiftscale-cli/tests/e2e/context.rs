//! Shared setup for the live tests

use std::path::PathBuf;

use swiftscale_cli::commands::ClusterArgs;
use swiftscale_cli::config::E2eConfig;

/// Install a fmt subscriber once per test binary.
pub fn init_e2e_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Resolve the suite config from `SWIFTSCALE_*` variables.
///
/// Clap's `env` binding is not in play here, so the variables are read
/// directly and passed through the same resolution as the CLI.
pub fn config_from_env() -> Result<E2eConfig, String> {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    let args = ClusterArgs {
        config: var("SWIFTSCALE_CONFIG").map(PathBuf::from),
        namespace: var("SWIFTSCALE_NAMESPACE"),
        kubeconfig: var("SWIFTSCALE_KUBECONFIG").map(PathBuf::from),
        kubectl: var("SWIFTSCALE_KUBECTL"),
    };
    E2eConfig::resolve(&args).map_err(|e| e.to_string())
}
