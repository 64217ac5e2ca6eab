//! Live test: apply the openstack-swift fixture and check KEDA accepts it
//!
//! ```bash
//! cargo test -p swiftscale-cli --features provider-e2e --test e2e test_openstack_swift_e2e -- --nocapture
//! ```

#![cfg(feature = "provider-e2e")]

use std::sync::Arc;

use swiftscale_cli::commands::e2e::{run_suite, SuitePlan};
use swiftscale_cli::commands::kubectl_for;
use tracing::info;

use super::context::{config_from_env, init_e2e_test};

#[tokio::test]
async fn test_openstack_swift_e2e() {
    init_e2e_test();
    info!("Starting E2E test: openstack-swift trigger");

    let config = config_from_env().unwrap();
    let plan = SuitePlan::from_config(&config).unwrap();
    let kubectl = Arc::new(kubectl_for(&config));

    match run_suite(kubectl, plan, config.timeout()).await {
        Ok(()) => info!("TEST PASSED: openstack-swift"),
        Err(e) => panic!("openstack-swift E2E failed: {}", e),
    }
}
