//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_creates_config() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;

  run_wp_release(&plugin.path, &["init"])?;

  assert!(plugin.file_exists("release.toml"));
  let config = plugin.read_file("release.toml")?;
  assert!(config.contains("[plugin]"));
  assert!(config.contains("slug = \"demo\""));
  assert!(config.contains("plugin_vs_readme"));

  // the written defaults load back
  run_wp_release(&plugin.path, &["versions"])?;

  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  plugin.write("release.toml", "[plugin]\nslug = \"custom\"\n")?;

  let output = run_wp_release_raw(&plugin.path, &["init"])?;
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(plugin.read_file("release.toml")?, "[plugin]\nslug = \"custom\"\n");

  run_wp_release(&plugin.path, &["init", "--force"])?;
  assert!(plugin.read_file("release.toml")?.contains("slug = \"demo\""));

  Ok(())
}

#[test]
fn test_init_without_manifest() -> Result<()> {
  let plugin = TestPlugin::empty()?;

  run_wp_release(&plugin.path, &["init"])?;

  let config = plugin.read_file("release.toml")?;
  assert!(!config.contains("slug ="));

  Ok(())
}

#[test]
fn test_working_tree_flag() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  let elsewhere = TestPlugin::empty()?;
  let dir = plugin.path.to_string_lossy().into_owned();

  run_wp_release(&elsewhere.path, &["-C", &dir, "readme"])?;

  assert!(plugin.file_exists("README.md"));
  assert!(!elsewhere.file_exists("README.md"));

  Ok(())
}
