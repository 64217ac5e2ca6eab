//! Suite runner with before / serial tests / after-always semantics
//!
//! The `before` hook runs once; if it fails every test is skipped. Tests run
//! one at a time in registration order. The `after_always` hook runs last no
//! matter what happened before it, including panics.

use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::Error;

type Step = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), String>> + Send>;

/// Which part of the suite a step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// The once-only setup hook
    Before,
    /// A test body
    Test,
    /// The always-run teardown hook
    AfterAlways,
}

/// How a step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Completed without error
    Passed,
    /// Returned an error or panicked
    Failed(String),
    /// Not run because setup failed
    Skipped,
}

/// One row of the suite summary
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name
    pub name: String,
    /// Step kind
    pub kind: StepKind,
    /// Outcome
    pub outcome: Outcome,
    /// Wall-clock time spent
    pub duration: Duration,
}

/// A suite of serial tests with setup and teardown hooks
pub struct Suite {
    name: String,
    before: Option<Step>,
    tests: Vec<(String, Step)>,
    after: Option<Step>,
}

impl Suite {
    /// Create an empty suite
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before: None,
            tests: Vec::new(),
            after: None,
        }
    }

    /// Set the setup hook, run once before any test
    pub fn before<F, Fut, E>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + 'static,
    {
        self.before = Some(boxed(hook));
        self
    }

    /// Register a test; tests run serially in registration order
    pub fn test<F, Fut, E>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + 'static,
    {
        self.tests.push((name.into(), boxed(body)));
        self
    }

    /// Set the teardown hook, run regardless of earlier outcomes
    pub fn after_always<F, Fut, E>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + 'static,
    {
        self.after = Some(boxed(hook));
        self
    }

    /// Run every step and collect the results.
    pub async fn run(self) -> SuiteReport {
        let mut results = Vec::with_capacity(self.tests.len() + 2);
        info!(suite = %self.name, tests = self.tests.len(), "Starting suite");

        let mut setup_ok = true;
        if let Some(hook) = self.before {
            let result = run_step("before", StepKind::Before, hook).await;
            setup_ok = result.outcome == Outcome::Passed;
            results.push(result);
        }

        for (name, body) in self.tests {
            if !setup_ok {
                warn!(test = %name, "Skipping test because setup failed");
                results.push(StepResult {
                    name,
                    kind: StepKind::Test,
                    outcome: Outcome::Skipped,
                    duration: Duration::ZERO,
                });
                continue;
            }
            results.push(run_step(&name, StepKind::Test, body).await);
        }

        if let Some(hook) = self.after {
            results.push(run_step("after.always", StepKind::AfterAlways, hook).await);
        }

        SuiteReport {
            suite: self.name,
            results,
        }
    }
}

fn boxed<F, Fut, E>(f: F) -> Step
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + 'static,
{
    Box::new(move || f().map(|r| r.map_err(|e| e.to_string())).boxed())
}

async fn run_step(name: &str, kind: StepKind, step: Step) -> StepResult {
    let start = Instant::now();
    let outcome = match AssertUnwindSafe(step()).catch_unwind().await {
        Ok(Ok(())) => Outcome::Passed,
        Ok(Err(e)) => Outcome::Failed(e),
        Err(panic) => {
            let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Outcome::Failed(format!("PANIC: {msg}"))
        }
    };
    if let Outcome::Failed(ref e) = outcome {
        warn!(step = %name, error = %e, "Step failed");
    }
    StepResult {
        name: name.to_string(),
        kind,
        outcome,
        duration: start.elapsed(),
    }
}

/// Results of a finished suite
#[derive(Debug, Clone)]
pub struct SuiteReport {
    suite: String,
    results: Vec<StepResult>,
}

impl SuiteReport {
    /// Every step, in execution order
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    /// Outcome of the named step
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.results
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    /// Names of failed and skipped steps
    pub fn failures(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.outcome != Outcome::Passed)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Passed and total test bodies; hooks are not counted
    pub fn test_counts(&self) -> (usize, usize) {
        let tests = self.results.iter().filter(|r| r.kind == StepKind::Test);
        let passed = tests
            .clone()
            .filter(|r| r.outcome == Outcome::Passed)
            .count();
        (passed, tests.count())
    }

    /// Failed hooks (before / after.always)
    pub fn hook_failures(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.kind != StepKind::Test && matches!(r.outcome, Outcome::Failed(_)))
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Log the summary and turn any failure into an error.
    pub fn finish(&self) -> crate::Result<()> {
        let total: Duration = self.results.iter().map(|r| r.duration).sum();
        let (passed, tests) = self.test_counts();

        info!("========================================");
        info!("  {}", self.suite.to_uppercase());
        info!("========================================");
        for r in &self.results {
            let tag = match r.outcome {
                Outcome::Passed => "PASS",
                Outcome::Failed(_) => "FAIL",
                Outcome::Skipped => "SKIP",
            };
            let label = match r.kind {
                StepKind::Test => "test",
                StepKind::Before | StepKind::AfterAlways => "hook",
            };
            info!("  {tag}  {label}  {:40} {:.1}s", r.name, r.duration.as_secs_f64());
            if let Outcome::Failed(ref e) = r.outcome {
                // Keep the summary readable
                let truncated: String = e.chars().take(200).collect();
                info!("        -> {truncated}");
            }
        }
        info!("----------------------------------------");
        let failures = self.failures();
        info!(
            "  {}/{} tests passed, {} hook(s) failed ({:.1}s total)",
            passed,
            tests,
            self.hook_failures().len(),
            total.as_secs_f64()
        );
        info!("========================================");

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::SuiteFailed {
                suite: self.suite.clone(),
                failures: failures.into_iter().map(str::to_string).collect(),
            })
        }
    }
}
