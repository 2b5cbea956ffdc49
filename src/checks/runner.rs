//! Check runner for executing pre-release checks

use super::trait_def::{Check, CheckResult};
use crate::core::context::ReleaseContext;
use std::sync::Arc;

/// Check runner that executes multiple checks
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results
  ///
  /// A check that cannot run (unreadable file, missing pattern) is reported as a failed
  /// result instead of aborting the other checks.
  pub fn run_all(&self, ctx: &ReleaseContext) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for check in &self.checks {
      tracing::debug!("running check '{}': {}", check.name(), check.description());
      match check.run(ctx) {
        Ok(result) => results.push(result),
        Err(err) => results.push(CheckResult::error(check.name(), err.to_string(), err.help_message())),
      }
    }

    results
  }

  /// Get all registered checks
  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with all built-in checks
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();

  runner.add_check(Arc::new(super::versions::VersionConsistencyCheck));
  runner.add_check(Arc::new(super::textdomain::TextDomainCheck));

  runner
}
