//! Tests for the `languages` chain

use crate::helpers::*;
use anyhow::Result;

const OFFLINE_CONFIG: &str = "[i18n]\npush = []\npull = []\n";

const GERMAN_PO: &str = "msgid \"\"
msgstr \"\"
\"Content-Type: text/plain; charset=UTF-8\\n\"

msgid \"Hello\"
msgstr \"Hallo\"

#, fuzzy
msgid \"Goodbye\"
msgstr \"Tschüss\"
";

fn plugin_with_strings() -> Result<TestPlugin> {
  let plugin = TestPlugin::new("demo")?;
  plugin.write(
    "demo.php",
    &format!(
      "{}echo __( 'Hello', 'demo' );\necho __( 'Goodbye', 'demo' );\n_e( 'Yes', 'demo' );\n",
      MAIN_FILE
    ),
  )?;
  plugin.write("release.toml", OFFLINE_CONFIG)?;
  Ok(plugin)
}

#[test]
fn test_languages_writes_catalog_and_compiles() -> Result<()> {
  let plugin = plugin_with_strings()?;
  plugin.write("languages/demo-de_DE.po", GERMAN_PO)?;

  run_wp_release(&plugin.path, &["languages"])?;

  let pot = plugin.read_file("languages/demo.pot")?;
  assert!(pot.contains("msgid \"Hello\""));
  assert!(pot.contains("msgid \"Goodbye\""));
  assert!(pot.contains("#: demo.php:"));
  assert!(pot.contains("Project-Id-Version: "));
  assert!(pot.contains("X-Textdomain-Support: yes"));

  // excluded string and excluded header meta
  assert!(!pot.contains("msgid \"Yes\""));
  assert!(!pot.contains("Plugin Name of the plugin/theme"));
  assert!(!pot.contains("msgid \"WPStore.io\""));

  let mo = std::fs::read(plugin.path.join("languages/demo-de_DE.mo"))?;
  assert_eq!(&mo[..4], &0x950412de_u32.to_le_bytes());
  assert!(mo.windows(5).any(|w| w == b"Hallo"));
  // fuzzy entries are not compiled
  assert!(!mo.windows(7).any(|w| w == "Tschüss".as_bytes()));

  Ok(())
}

#[test]
fn test_frozen_timestamp_leaves_catalog_untouched() -> Result<()> {
  let plugin = plugin_with_strings()?;
  plugin.write("release.toml", &format!("{}update_timestamp = false\n", OFFLINE_CONFIG))?;

  run_wp_release(&plugin.path, &["languages"])?;
  let first = plugin.read_file("languages/demo.pot")?;

  std::thread::sleep(std::time::Duration::from_millis(1100));
  run_wp_release(&plugin.path, &["languages"])?;
  let second = plugin.read_file("languages/demo.pot")?;

  assert_eq!(first, second);

  Ok(())
}

#[test]
fn test_failing_push_stops_chain() -> Result<()> {
  let plugin = plugin_with_strings()?;
  plugin.write(
    "release.toml",
    "[i18n]\npush = [\"wp-release-no-such-tool\"]\npull = []\n",
  )?;
  plugin.write("languages/demo-de_DE.po", GERMAN_PO)?;

  let output = run_wp_release_raw(&plugin.path, &["languages"])?;

  assert_eq!(output.status.code(), Some(2));
  // catalog was written before the push, compilation never ran
  assert!(plugin.file_exists("languages/demo.pot"));
  assert!(!plugin.file_exists("languages/demo-de_DE.mo"));

  Ok(())
}
