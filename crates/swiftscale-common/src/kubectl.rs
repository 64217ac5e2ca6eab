//! kubectl invocation
//!
//! Manifests are written to a temporary file and applied with
//! `kubectl -n <ns> apply -f <file>`. The exit code is the only signal: zero
//! passes, anything else fails the step.

use std::io::Write;
use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info};

use crate::{Error, Result};

/// Failure message when applying the manifest exits non-zero
pub const APPLY_FAILURE_MESSAGE: &str = "creating scaledObject should work.";

/// Failure message when deleting the manifest exits non-zero
pub const DELETE_FAILURE_MESSAGE: &str = "deleting scaledObject should work.";

/// Result of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with code 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Runs kubectl with the given arguments (allows mocking in tests)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run kubectl with `args` and wait for it to exit
    async fn run(&self, args: &[String]) -> Result<CommandOutput>;
}

/// Runner that spawns the real kubectl binary
#[derive(Debug, Clone)]
pub struct KubectlRunner {
    binary: String,
    kubeconfig: Option<PathBuf>,
}

impl KubectlRunner {
    /// Use a specific kubectl binary
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig: None,
        }
    }

    /// Pass `--kubeconfig` on every invocation
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Self {
        self.kubeconfig = kubeconfig;
        self
    }

    fn full_args(&self, args: &[String]) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(ref kc) = self.kubeconfig {
            full.push("--kubeconfig".to_string());
            full.push(kc.display().to_string());
        }
        full.extend(args.iter().cloned());
        full
    }
}

#[async_trait]
impl CommandRunner for KubectlRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        let full = self.full_args(args);
        let command_line = format!("{} {}", self.binary, full.join(" "));
        debug!(command = %command_line, "Executing kubectl");

        let output = Command::new(&self.binary)
            .args(&full)
            .output()
            .await
            .map_err(|e| {
                Error::command_failed(&command_line, format!("failed to execute: {}", e))
            })?;

        Ok(CommandOutput::from(output))
    }
}

/// kubectl operations used by the suite
pub struct Kubectl<R: CommandRunner = KubectlRunner> {
    runner: R,
}

impl<R: CommandRunner> Kubectl<R> {
    /// Use a custom command runner
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Apply a manifest in `namespace`; fails unless kubectl exits 0.
    pub async fn apply_manifest(&self, namespace: &str, manifest: &str) -> Result<()> {
        let file = write_manifest(manifest)?;
        let args = with_file(&["-n", namespace, "apply"], &file);
        self.run_checked(&args, APPLY_FAILURE_MESSAGE).await?;
        info!(namespace = %namespace, "Manifest applied");
        Ok(())
    }

    /// Delete everything in a manifest; resources already gone are ignored.
    pub async fn delete_manifest(&self, namespace: &str, manifest: &str) -> Result<()> {
        let file = write_manifest(manifest)?;
        let args = with_file(&["-n", namespace, "delete", "--ignore-not-found"], &file);
        self.run_checked(&args, DELETE_FAILURE_MESSAGE).await?;
        info!(namespace = %namespace, "Manifest deleted");
        Ok(())
    }

    /// Whether `kind/name` exists in `namespace`.
    pub async fn exists(&self, namespace: &str, kind: &str, name: &str) -> Result<bool> {
        let args: Vec<String> = [
            "-n",
            namespace,
            "get",
            kind,
            name,
            "-o",
            "name",
            "--ignore-not-found",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let output = self
            .run_checked(&args, &format!("getting {}/{} failed.", kind, name))
            .await?;
        Ok(!output.stdout.trim().is_empty())
    }

    async fn run_checked(&self, args: &[String], failure: &str) -> Result<CommandOutput> {
        let output = self.runner.run(args).await?;
        if !output.success() {
            let stderr = output.stderr.trim();
            let message = match output.code {
                Some(code) => format!("{} (exit code {}): {}", failure, code, stderr),
                None => format!("{} (killed by signal): {}", failure, stderr),
            };
            return Err(Error::command_failed(
                format!("kubectl {}", args.join(" ")),
                message,
            ));
        }
        Ok(output)
    }
}

/// Write a manifest to a temp file that lives until the returned handle drops.
fn write_manifest(manifest: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("swiftscale-")
        .suffix(".yaml")
        .tempfile()?;
    file.write_all(manifest.as_bytes())?;
    file.flush()?;
    debug!(path = %file.path().display(), "Wrote manifest");
    Ok(file)
}

fn with_file(prefix: &[&str], file: &NamedTempFile) -> Vec<String> {
    let mut args: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
    args.push("-f".to_string());
    args.push(file.path().display().to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn failed(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    #[tokio::test]
    async fn apply_writes_manifest_and_targets_namespace() {
        let seen_path = Arc::new(Mutex::new(None));
        let seen = seen_path.clone();

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|args| {
                args.len() == 5
                    && args[0] == "-n"
                    && args[1] == "kedopenstack"
                    && args[2] == "apply"
                    && args[3] == "-f"
            })
            .times(1)
            .returning(move |args| {
                let contents = std::fs::read_to_string(&args[4]).unwrap();
                assert_eq!(contents, "kind: Secret\n");
                *seen.lock().unwrap() = Some(args[4].clone());
                Ok(ok("secret/openstack-secret created\n"))
            });

        let kubectl = Kubectl::with_runner(runner);
        kubectl
            .apply_manifest("kedopenstack", "kind: Secret\n")
            .await
            .unwrap();

        let path = seen_path.lock().unwrap().clone().unwrap();
        assert!(path.ends_with(".yaml"));
        assert!(
            !std::path::Path::new(&path).exists(),
            "temp manifest should be removed after apply"
        );
    }

    #[tokio::test]
    async fn apply_non_zero_exit_fails_with_assertion_message() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(failed(1, "error: unable to recognize \"x.yaml\"")));

        let err = Kubectl::with_runner(runner)
            .apply_manifest("kedopenstack", "kind: Secret\n")
            .await
            .unwrap_err();

        match err {
            Error::CommandFailed { command, message } => {
                assert!(command.starts_with("kubectl -n kedopenstack apply -f "));
                assert!(message.starts_with(APPLY_FAILURE_MESSAGE));
                assert!(message.contains("exit code 1"));
                assert!(message.contains("unable to recognize"));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn signal_termination_is_a_failure() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| {
            Ok(CommandOutput {
                code: None,
                stdout: String::new(),
                stderr: String::new(),
            })
        });

        let err = Kubectl::with_runner(runner)
            .apply_manifest("ns", "kind: Secret\n")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("killed by signal"));
    }

    #[tokio::test]
    async fn runner_errors_propagate() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_| {
                Err(Error::command_failed(
                    "kubectl",
                    "failed to execute: not found",
                ))
            });

        let err = Kubectl::with_runner(runner)
            .apply_manifest("ns", "kind: Secret\n")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn delete_ignores_missing_resources() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|args| {
                args[2] == "delete" && args[3] == "--ignore-not-found" && args[4] == "-f"
            })
            .times(1)
            .returning(|_| Ok(ok("")));

        Kubectl::with_runner(runner)
            .delete_manifest("kedopenstack", "kind: Secret\n")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn exists_reads_stdout() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|args| {
                args[2] == "get" && args[3] == "scaledobject" && args[4] == "swift-scaledobject"
            })
            .times(2)
            .returning({
                let mut calls = 0;
                move |_| {
                    calls += 1;
                    if calls == 1 {
                        Ok(ok("scaledobject.keda.sh/swift-scaledobject\n"))
                    } else {
                        Ok(ok(""))
                    }
                }
            });

        let kubectl = Kubectl::with_runner(runner);
        assert!(kubectl
            .exists("kedopenstack", "scaledobject", "swift-scaledobject")
            .await
            .unwrap());
        assert!(!kubectl
            .exists("kedopenstack", "scaledobject", "swift-scaledobject")
            .await
            .unwrap());
    }

    #[test]
    fn kubeconfig_is_prepended() {
        let runner =
            KubectlRunner::new("kubectl").with_kubeconfig(Some(PathBuf::from("/tmp/kc")));
        let args = runner.full_args(&["get".to_string(), "pods".to_string()]);
        assert_eq!(args, vec!["--kubeconfig", "/tmp/kc", "get", "pods"]);
    }

    #[test]
    fn exit_codes_map_to_success() {
        assert!(ok("").success());
        assert!(!failed(2, "").success());
    }
}
