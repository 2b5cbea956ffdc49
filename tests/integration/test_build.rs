//! Tests for the `build` chain

use crate::helpers::*;
use anyhow::Result;

const A_PHP: &str = "<?php
/*
 * Plugin Name: Demo
 * Version: 1.2.0
 */
";

const A_ONLY_CONFIG: &str = r#"[plugin]
main_file = "a.php"

[versions]
checks = []

[build]
files = ["**", "!.git/**", "!build/**", "!package.json", "!readme.txt", "!README.md", "!release.toml"]
"#;

#[test]
fn test_build_stages_and_archives_plugin() -> Result<()> {
  let plugin = TestPlugin::empty()?;
  plugin.write("package.json", "{\"name\": \"demo\", \"version\": \"1.2.0\"}\n")?;
  plugin.write("a.php", A_PHP)?;
  plugin.write(".git/config", "[core]\n")?;
  plugin.write("readme.txt", "=== Demo ===\nStable tag: 1.2.0\n")?;
  plugin.write("release.toml", A_ONLY_CONFIG)?;

  run_wp_release(&plugin.path, &["build"])?;

  assert!(plugin.file_exists("build/demo/a.php"));
  assert!(!plugin.file_exists("build/demo/.git"));
  assert!(!plugin.file_exists("build/demo/package.json"));

  assert!(plugin.file_exists("build/demo.1.2.0.zip"));
  let entries = plugin.zip_entries("build/demo.1.2.0.zip")?;
  assert_eq!(entries, vec!["demo/", "demo/a.php"]);

  Ok(())
}

#[test]
fn test_build_with_default_config() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  plugin.write("inc/admin.php", "<?php\r\n_e( 'Settings', 'demo' );\r\n")?;

  let output = run_wp_release(&plugin.path, &["build"])?;
  assert!(stdout(&output).contains("demo.1.2.0.zip"));

  // default file set keeps the readme, drops the manifest and VCS metadata
  assert!(plugin.file_exists("build/demo/demo.php"));
  assert!(plugin.file_exists("build/demo/readme.txt"));
  assert!(plugin.file_exists("build/demo/inc/admin.php"));
  assert!(!plugin.file_exists("build/demo/package.json"));
  assert!(!plugin.file_exists("build/demo/.git"));
  assert!(plugin.file_exists("README.md"));

  let staged = plugin.read_file("build/demo/inc/admin.php")?;
  assert!(!staged.contains('\r'));

  let entries = plugin.zip_entries("build/demo.1.2.0.zip")?;
  assert!(entries.contains(&"demo/inc/admin.php".to_string()));
  assert!(entries.iter().all(|e| e.starts_with("demo/")));
  assert!(!entries.iter().any(|e| e.contains(".git")));

  Ok(())
}

#[test]
fn test_version_mismatch_aborts_before_staging() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  plugin.write_readme("1.1.0")?;

  let output = run_wp_release_raw(&plugin.path, &["build"])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(!plugin.file_exists("build"));
  assert!(!plugin.file_exists("README.md"));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("1.1.0"));

  Ok(())
}

#[test]
fn test_build_dry_run_lists_tasks() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;

  let output = run_wp_release(&plugin.path, &["build", "--dry-run"])?;
  let text = stdout(&output);
  assert!(text.contains("check-versions"));
  assert!(text.contains("archive"));
  assert!(!plugin.file_exists("build"));

  let output = run_wp_release(&plugin.path, &["deploy", "--dry-run", "--json"])?;
  let tasks: Vec<String> = serde_json::from_slice(&output.stdout)?;
  assert_eq!(tasks.first().map(String::as_str), Some("check-versions"));
  assert_eq!(tasks.last().map(String::as_str), Some("deploy"));

  Ok(())
}

#[test]
fn test_rebuild_replaces_stale_staging() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  plugin.write("build/demo/stale.php", "<?php\n")?;

  run_wp_release(&plugin.path, &["build"])?;

  assert!(!plugin.file_exists("build/demo/stale.php"));
  assert!(plugin.file_exists("build/demo/demo.php"));

  Ok(())
}
