//! Pre-release check command
//!
//! Runs every registered check and reports them side by side, without stopping at the
//! first failure the way a chain does.

use crate::checks::{Severity, create_default_runner};
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult};

/// Run all checks; fails when any check reports an error
pub fn run_check(ctx: &ReleaseContext, json: bool) -> ReleaseResult<()> {
  let runner = create_default_runner();
  let results = runner.run_all(ctx);
  let blocking = results.iter().filter(|r| r.is_blocking()).count();

  if json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  } else {
    println!("🏥 Running pre-release checks...\n");

    println!("📋 Registered checks:");
    for check in runner.checks() {
      println!("   • {}: {}", check.name(), check.description());
    }
    println!();

    let mut has_warnings = false;
    for result in &results {
      let icon = match (result.passed, result.severity) {
        (true, _) => "✅",
        (false, Severity::Warning) => "⚠️ ",
        (false, _) => "❌",
      };
      println!("{} {}: {}", icon, result.check_name, result.message);

      if !result.passed {
        if let Some(ref suggestion) = result.suggestion {
          println!("   💡 Fix: {}", suggestion);
        }
        has_warnings |= result.severity == Severity::Warning;
      }
      println!();
    }

    let passed_count = results.iter().filter(|r| r.passed).count();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Summary: {}/{} checks passed", passed_count, results.len());

    if blocking > 0 {
      println!("\n⚠️  Critical issues found. Please fix errors before releasing.");
    } else if has_warnings {
      println!("\n⚠️  Some warnings found. Consider addressing them.");
    } else {
      println!("\n✨ All checks passed! Ready to release.");
    }
  }

  if blocking > 0 {
    return Err(ReleaseError::Validation {
      reason: format!("{} check(s) failed", blocking),
    });
  }
  Ok(())
}
