use crate::checks::versions::check_versions;
use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;

/// Run only the version consistency checks
pub fn run_versions(ctx: &ReleaseContext, json: bool) -> ReleaseResult<()> {
  let outcomes = check_versions(ctx)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    return Ok(());
  }

  println!("🔍 Version checks for {}\n", ctx.slug());
  for outcome in &outcomes {
    println!(
      "✅ {}: {} == {} ({})",
      outcome.name, outcome.left_source, outcome.right_source, outcome.version
    );
  }
  if outcomes.is_empty() {
    println!("⚠️  No version checks configured");
  }

  Ok(())
}
