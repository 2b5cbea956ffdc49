//! Tests for the `watch` command

use crate::helpers::*;
use anyhow::Result;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Poll `check` until it holds or the timeout passes
fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
  let start = Instant::now();
  while start.elapsed() < timeout {
    if check() {
      return true;
    }
    std::thread::sleep(Duration::from_millis(100));
  }
  false
}

#[test]
fn test_watch_reconverts_changed_readme() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;

  let mut child = Command::new(env!("CARGO_BIN_EXE_wp-release"))
    .current_dir(&plugin.path)
    .arg("watch")
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()?;

  let initial = wait_for(Duration::from_secs(10), || {
    plugin.read_file("README.md").map(|md| md.starts_with("# Demo #")).unwrap_or(false)
  });

  plugin.write("readme.txt", "=== Demo Renamed ===\nStable tag: 1.2.0\n")?;
  let updated = wait_for(Duration::from_secs(10), || {
    plugin
      .read_file("README.md")
      .map(|md| md.starts_with("# Demo Renamed #"))
      .unwrap_or(false)
  });

  child.kill()?;
  child.wait()?;

  assert!(initial, "initial conversion never happened");
  assert!(updated, "README.md was not regenerated after readme.txt changed");

  Ok(())
}
