//! Tests for `versions`, `audit` and `check`

use crate::helpers::*;
use anyhow::Result;
use serde_json::Value;

#[test]
fn test_versions_json() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;

  let output = run_wp_release(&plugin.path, &["versions", "--json"])?;
  let outcomes: Vec<Value> = serde_json::from_slice(&output.stdout)?;

  assert_eq!(outcomes.len(), 3);
  assert!(outcomes.iter().all(|o| o["version"] == "1.2.0"));
  assert_eq!(outcomes[0]["name"], "plugin_vs_readme");

  Ok(())
}

#[test]
fn test_versions_reports_mismatch() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  plugin.write("package.json", "{\"name\": \"demo\", \"version\": \"1.3.0\"}\n")?;

  let output = run_wp_release_raw(&plugin.path, &["versions"])?;
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("plugin_vs_manifest"));
  assert!(stderr.contains("💡 Help:"));

  Ok(())
}

#[test]
fn test_audit_json_findings() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  plugin.write(
    "inc/view.php",
    "<?php\n_e( 'Hi', 'other' );\necho __( 'Bye' );\necho esc_html__( 'Ok', $domain );\n",
  )?;

  let output = run_wp_release(&plugin.path, &["audit", "--json"])?;
  let findings: Vec<Value> = serde_json::from_slice(&output.stdout)?;

  assert_eq!(findings.len(), 3);
  assert_eq!(findings[0]["file"], "inc/view.php");
  assert_eq!(findings[0]["line"], 2);
  assert_eq!(findings[0]["kind"], "mismatched_domain");
  assert_eq!(findings[0]["found"], "other");
  assert_eq!(findings[1]["kind"], "missing_domain");
  assert_eq!(findings[2]["kind"], "variable_domain");

  Ok(())
}

#[test]
fn test_strict_audit_fails() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;
  plugin.write("inc/view.php", "<?php\n_e( 'Hi', 'other' );\n")?;

  // findings alone do not fail
  run_wp_release(&plugin.path, &["audit"])?;

  let output = run_wp_release_raw(&plugin.path, &["audit", "--strict"])?;
  assert_eq!(output.status.code(), Some(3));

  let output = run_wp_release_raw(&plugin.path, &["build", "--strict"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(!plugin.file_exists("build/demo.1.2.0.zip"));

  Ok(())
}

#[test]
fn test_check_reports_all_checks() -> Result<()> {
  let plugin = TestPlugin::new("demo")?;

  let output = run_wp_release(&plugin.path, &["check"])?;
  let text = stdout(&output);
  assert!(text.contains("versions"));
  assert!(text.contains("text-domain"));
  assert!(text.contains("Summary: 2/2 checks passed"));

  plugin.write_readme("1.0.0")?;
  let output = run_wp_release_raw(&plugin.path, &["check", "--json"])?;
  assert_eq!(output.status.code(), Some(3));

  let results: Vec<Value> = serde_json::from_slice(&output.stdout)?;
  let versions = results
    .iter()
    .find(|r| r["check_name"] == "versions")
    .ok_or_else(|| anyhow::anyhow!("no versions result"))?;
  assert_eq!(versions["passed"], false);

  Ok(())
}

#[test]
fn test_missing_manifest_is_user_error() -> Result<()> {
  let plugin = TestPlugin::empty()?;
  plugin.write("demo.php", MAIN_FILE)?;

  let output = run_wp_release_raw(&plugin.path, &["versions"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
