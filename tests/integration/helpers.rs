//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Plugin header of the main file, version 1.2.0
pub const MAIN_FILE: &str = "<?php
/**
 * Plugin Name: Demo
 * Version: 1.2.0
 * Author: WPStore.io
 */
class Demo {
\tpublic $version = '1.2.0';
}
";

/// A scratch plugin working tree
pub struct TestPlugin {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestPlugin {
  /// Empty working tree
  pub fn empty() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Plugin `name` at version 1.2.0 with package.json, main file and readme.txt
  pub fn new(name: &str) -> Result<Self> {
    let plugin = Self::empty()?;

    plugin.write(
      "package.json",
      &format!("{{\n  \"name\": \"{}\",\n  \"version\": \"1.2.0\"\n}}\n", name),
    )?;
    plugin.write(&format!("{}.php", name), MAIN_FILE)?;
    plugin.write_readme("1.2.0")?;

    // Version control metadata must never be staged
    plugin.write(".git/config", "[core]\n\trepositoryformatversion = 0\n")?;

    Ok(plugin)
  }

  /// (Re)write readme.txt with the given stable tag
  pub fn write_readme(&self, stable_tag: &str) -> Result<()> {
    self.write(
      "readme.txt",
      &format!(
        "=== Demo ===\nContributors: wpstore\nStable tag: {}\n\nShort description.\n\n== Description ==\n\nLong description.\n\n== Screenshots ==\n\n1. The dashboard\n",
        stable_tag
      ),
    )
  }

  /// Write a file, creating parent directories
  pub fn write(&self, path: &str, content: &str) -> Result<()> {
    let file = self.path.join(path);
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file, content).with_context(|| format!("Failed to write {}", file.display()))?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Names of the entries in a zip archive, in archive order
  pub fn zip_entries(&self, path: &str) -> Result<Vec<String>> {
    let file = std::fs::File::open(self.path.join(path))?;
    let archive = zip::ZipArchive::new(file)?;
    Ok(archive.file_names().map(String::from).collect())
  }
}

/// Run wp-release, failing on a non-zero exit
pub fn run_wp_release(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_wp_release_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "wp-release command failed: wp-release {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run wp-release and return its output whatever the exit status
pub fn run_wp_release_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_wp-release");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run wp-release")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}
