//! Render command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::ClusterArgs;
use crate::config::E2eConfig;
use crate::Result;

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: RenderArgs) -> Result<()> {
    let config = E2eConfig::resolve(&args.cluster)?;
    let yaml = render(&config)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &yaml)?;
            info!(path = %path.display(), "Wrote manifest");
        }
        None => print!("{}", yaml),
    }
    Ok(())
}

/// Build, validate and render the configured fixture.
pub fn render(config: &E2eConfig) -> Result<String> {
    let bundle = config.fixture().build();
    bundle.validate()?;
    Ok(bundle.to_yaml()?)
}
