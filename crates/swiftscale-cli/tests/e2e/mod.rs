//! End-to-end tests against a live cluster with KEDA installed
//!
//! The cluster must be able to reach the Swift and Keystone endpoints named
//! in the fixture (or in the config file). Everything is gated behind the
//! `provider-e2e` feature so a plain `cargo test` never touches a cluster.
//!
//! ```bash
//! SWIFTSCALE_KUBECONFIG=~/.kube/devstack \
//! SWIFTSCALE_CONFIG=./swiftscale.json \
//! cargo test -p swiftscale-cli --features provider-e2e --test e2e -- --nocapture
//! ```

#[cfg(feature = "provider-e2e")]
mod context;
mod openstack_swift_e2e;
