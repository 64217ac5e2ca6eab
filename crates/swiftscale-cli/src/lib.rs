//! swiftscale CLI library

pub mod commands;
pub mod config;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

/// swiftscale - end-to-end harness for the KEDA openstack-swift trigger
#[derive(Parser, Debug)]
#[command(name = "swiftscale")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the fixture manifest
    Render(commands::render::RenderArgs),
    /// Parse and validate a manifest file without touching the cluster
    Validate(commands::validate::ValidateArgs),
    /// Apply the fixture (or a manifest file) with kubectl
    Apply(commands::apply::ApplyArgs),
    /// Delete the fixture (or a manifest file) with kubectl
    Delete(commands::apply::ApplyArgs),
    /// Run the end-to-end suite: apply, check, always clean up
    E2e(commands::e2e::E2eArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Render(args) => commands::render::run(args).await,
            Commands::Validate(args) => commands::validate::run(args).await,
            Commands::Apply(args) => commands::apply::run_apply(args).await,
            Commands::Delete(args) => commands::apply::run_delete(args).await,
            Commands::E2e(args) => commands::e2e::run(args).await,
        }
    }
}
