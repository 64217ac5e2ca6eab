//! Validate command

use std::path::PathBuf;

use clap::Args;

use super::read_manifest;
use crate::Result;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest file to validate
    #[arg(short, long)]
    pub file: PathBuf,
}

pub async fn run(args: ValidateArgs) -> Result<()> {
    let summary = validate_file(&args.file)?;
    for line in summary {
        println!("  {}", line);
    }
    println!("{} valid", args.file.display());
    Ok(())
}

/// Validate a manifest file and describe what it would configure.
pub fn validate_file(path: &std::path::Path) -> Result<Vec<String>> {
    let bundle = read_manifest(path)?;
    let validated = bundle.validate()?;
    let spec = &bundle.scaled_object.spec;

    let mut lines = vec![
        format!(
            "namespace: {}",
            validated.namespace.as_deref().unwrap_or("(from kubectl -n)")
        ),
        format!("scale target: {}", spec.scale_target_ref.name),
        format!(
            "polling interval: {}s, cooldown period: {}s",
            spec.effective_polling_interval().as_secs(),
            spec.effective_cooldown_period().as_secs()
        ),
        format!("auth method: {}", validated.auth.method_name()),
    ];
    for trigger in &validated.triggers {
        lines.push(format!(
            "trigger {}: {} objects per replica at {}",
            trigger.metric_name(),
            trigger.object_count,
            trigger.container_url()?
        ));
    }
    Ok(lines)
}
