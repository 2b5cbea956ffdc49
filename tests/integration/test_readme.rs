//! Tests for the `readme` chain

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_readme_conversion() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;

  run_wp_release(&plugin.path, &["readme"])?;

  let md = plugin.read_file("README.md")?;
  assert!(md.starts_with("# Demo #\n"));
  assert!(md.contains("**Contributors:** [wpstore](https://profiles.wordpress.org/wpstore)"));
  assert!(md.contains("## Description ##"));
  assert!(md.contains("/wpstore/demo/develop/.assets/screenshot-1.png"));

  Ok(())
}

#[test]
fn test_readme_conversion_is_idempotent() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;

  run_wp_release(&plugin.path, &["readme"])?;
  let first = plugin.read_file("README.md")?;
  run_wp_release(&plugin.path, &["readme"])?;
  let second = plugin.read_file("README.md")?;

  assert_eq!(first, second);

  Ok(())
}

#[test]
fn test_readme_missing_source_fails() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  std::fs::remove_file(plugin.path.join("readme.txt"))?;

  let output = run_wp_release_raw(&plugin.path, &["readme"])?;
  assert!(!output.status.success());
  assert!(!plugin.file_exists("README.md"));

  Ok(())
}
