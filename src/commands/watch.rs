//! Rerun the readme conversion whenever readme.txt changes
//!
//! The readme's directory is watched rather than the file itself: editors often save by
//! writing a new file and renaming it over the old one, which drops a file watch.

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::readme;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;

/// Convert once, then again on every change until the process is stopped
pub fn run_watch(ctx: &ReleaseContext) -> ReleaseResult<()> {
  let source = ctx.readme_path();
  let dir = source.parent().unwrap_or(ctx.root());

  let (tx, rx) = channel();
  let mut watcher = RecommendedWatcher::new(
    move |res: notify::Result<Event>| {
      let _ = tx.send(res);
    },
    Config::default(),
  )?;
  watcher.watch(dir, RecursiveMode::NonRecursive)?;

  let output = readme::convert_readme(ctx)?;
  println!("📝 {} written", output.display());
  println!("👀 Watching {} (Ctrl+C to stop)\n", source.display());

  let conversions = reconvert_on_change(ctx, rx)?;
  tracing::debug!("watcher closed after {} conversion(s)", conversions);
  Ok(())
}

/// Convert the readme for every event touching it; returns the number of conversions
///
/// A failed conversion (a half-written file, a syntax slip) is logged and watching
/// continues. The loop ends when the event source closes.
pub fn reconvert_on_change<I>(ctx: &ReleaseContext, events: I) -> ReleaseResult<usize>
where
  I: IntoIterator<Item = notify::Result<Event>>,
{
  let source = ctx.readme_path();
  let mut conversions = 0;

  for event in events {
    let event = match event {
      Ok(event) => event,
      Err(e) => {
        tracing::warn!("watch error: {}", e);
        continue;
      }
    };
    if !touches(&event, &source) {
      continue;
    }

    match readme::convert_readme(ctx) {
      Ok(output) => {
        conversions += 1;
        tracing::info!("{} changed, rewrote {}", source.display(), output.display());
        println!("✅ {} updated", output.display());
      }
      Err(e) => tracing::warn!("readme conversion failed: {}", e),
    }
  }

  Ok(conversions)
}

fn touches(event: &Event, source: &Path) -> bool {
  (event.kind.is_create() || event.kind.is_modify()) && event.paths.iter().any(|p| p == source)
}
