//! The release chains: languages, readme, build, deploy

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::core::tools::SystemRunner;
use crate::pipeline::{Chain, Pipeline, PipelineOptions};
use chrono::Utc;

/// Flags shared by every chain command
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainFlags {
  pub dry_run: bool,
  pub strict: bool,
  pub json: bool,
}

/// Run a chain, or print its task list on `--dry-run`
pub fn run_chain(ctx: &ReleaseContext, chain: Chain, flags: ChainFlags) -> ReleaseResult<()> {
  if flags.dry_run {
    if flags.json {
      println!("{}", serde_json::to_string_pretty(chain.tasks())?);
      return Ok(());
    }
    println!("📋 Chain '{}' would run {} task(s):", chain, chain.tasks().len());
    for (i, task) in chain.tasks().iter().enumerate() {
      println!("   {}. {:<24} {}", i + 1, task.name(), task.description());
    }
    println!("\n💡 Run without --dry-run to execute");
    return Ok(());
  }

  if !flags.json {
    println!("🚀 Running '{}' for {}\n", chain, ctx.slug());
  }

  let options = PipelineOptions {
    strict: flags.strict,
    now: Utc::now(),
    progress: !flags.json,
  };
  let runner = SystemRunner;
  let report = Pipeline::new(ctx, &runner, options).run(chain)?;

  if flags.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
  println!("✨ '{}' finished: {} task(s) completed", chain, report.tasks.len());
  if let Some(artifact) = &report.artifact {
    println!("📦 {} ({})", artifact.archive().display(), artifact.version());
  }

  Ok(())
}
