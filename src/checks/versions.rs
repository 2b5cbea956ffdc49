//! Version consistency across the plugin header, readme, package.json and the
//! plugin's internal version constant
//!
//! Versions are opaque strings. `1.2` and `1.2.0` are different versions here; the
//! WordPress.org registry compares tags as strings too.

use super::trait_def::{Check, CheckResult};
use crate::core::context::ReleaseContext;
use crate::core::error::{ExtractionError, ReleaseError, ReleaseResult, ResultExt, VersionMismatch};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static PLUGIN_HEADER_VERSION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?mi)^[ \t/*#@]*Version:(.*)$").expect("static regex"));

static README_STABLE_TAG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?mi)^[ \t/*#@]*Stable tag:(.*)$").expect("static regex"));

static INTERNAL_VERSION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"version\s*=\s*'([^']*)'").expect("static regex"));

static HEADER_COMMENT_TAIL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s*(?:\*/|\?>).*").expect("static regex"));

/// Where a version string is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
  /// `Stable tag:` in readme.txt
  Readme,
  /// `Version:` in the plugin header
  Plugin,
  /// `version` in package.json
  Manifest,
  /// `version = '...'` constant in the plugin file
  Internal,
}

impl fmt::Display for VersionSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionSource::Readme => write!(f, "readme"),
      VersionSource::Plugin => write!(f, "plugin"),
      VersionSource::Manifest => write!(f, "manifest"),
      VersionSource::Internal => write!(f, "internal"),
    }
  }
}

/// Comparison operators; releases only ever need equality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
  Eq,
}

/// Compare two version strings
pub fn compare(left: &str, right: &str, op: CompareOp) -> bool {
  match op {
    CompareOp::Eq => left == right,
  }
}

/// Reads version strings from the plugin's files
pub struct VersionOracle<'a> {
  ctx: &'a ReleaseContext,
}

impl<'a> VersionOracle<'a> {
  pub fn new(ctx: &'a ReleaseContext) -> Self {
    Self { ctx }
  }

  /// Read one version; fails when the expected pattern is absent
  pub fn read_version(&self, source: VersionSource) -> ReleaseResult<String> {
    match source {
      VersionSource::Readme => {
        let path = self.ctx.readme_path();
        let content = read(&path)?;
        header_field(&README_STABLE_TAG, &content).ok_or_else(|| missing(&path, "Stable tag: <version>"))
      }
      VersionSource::Plugin => {
        let path = self.ctx.root.join(self.ctx.main_file());
        let content = read(&path)?;
        header_field(&PLUGIN_HEADER_VERSION, &content).ok_or_else(|| missing(&path, "Version: <version> header"))
      }
      VersionSource::Internal => {
        let path = self.ctx.root.join(self.ctx.main_file());
        let content = read(&path)?;
        INTERNAL_VERSION
          .captures(&content)
          .and_then(|c| c.get(1))
          .map(|m| m.as_str().trim().to_string())
          .filter(|v| !v.is_empty())
          .ok_or_else(|| missing(&path, "version = '<version>'"))
      }
      VersionSource::Manifest => {
        let path = self.ctx.root.join(&self.ctx.config.plugin.manifest);
        self
          .ctx
          .manifest
          .version
          .as_ref()
          .map(|v| v.trim().to_string())
          .filter(|v| !v.is_empty())
          .ok_or_else(|| missing(&path, "\"version\" field"))
      }
    }
  }
}

/// Outcome of one passed check
#[derive(Debug, Clone, Serialize)]
pub struct VersionCheckOutcome {
  pub name: String,
  pub left_source: VersionSource,
  pub right_source: VersionSource,
  pub version: String,
}

/// Run every configured check; the first mismatch aborts with `VersionMismatch`
pub fn check_versions(ctx: &ReleaseContext) -> ReleaseResult<Vec<VersionCheckOutcome>> {
  let oracle = VersionOracle::new(ctx);
  let mut cache: HashMap<VersionSource, String> = HashMap::new();
  let mut outcomes = Vec::new();

  for check in &ctx.config.versions.checks {
    let left = lookup(&oracle, &mut cache, check.left)?;
    let right = lookup(&oracle, &mut cache, check.right)?;

    if !compare(&left, &right, CompareOp::Eq) {
      return Err(ReleaseError::VersionMismatch(VersionMismatch {
        check: check.name.clone(),
        left_source: check.left.to_string(),
        left,
        right_source: check.right.to_string(),
        right,
      }));
    }

    tracing::debug!("version check '{}' passed ({})", check.name, left);
    outcomes.push(VersionCheckOutcome {
      name: check.name.clone(),
      left_source: check.left,
      right_source: check.right,
      version: left,
    });
  }

  Ok(outcomes)
}

fn lookup(
  oracle: &VersionOracle<'_>,
  cache: &mut HashMap<VersionSource, String>,
  source: VersionSource,
) -> ReleaseResult<String> {
  if let Some(version) = cache.get(&source) {
    return Ok(version.clone());
  }
  let version = oracle.read_version(source)?;
  cache.insert(source, version.clone());
  Ok(version)
}

/// Version consistency as a check
pub struct VersionConsistencyCheck;

impl Check for VersionConsistencyCheck {
  fn name(&self) -> &'static str {
    "versions"
  }

  fn description(&self) -> &'static str {
    "Plugin header, readme, package.json and internal version agree"
  }

  fn run(&self, ctx: &ReleaseContext) -> ReleaseResult<CheckResult> {
    match check_versions(ctx) {
      Ok(outcomes) => {
        let version = outcomes.first().map(|o| o.version.clone()).unwrap_or_default();
        Ok(
          CheckResult::pass(self.name(), format!("{} check(s) agree on '{}'", outcomes.len(), version))
            .with_details(serde_json::to_value(&outcomes)?),
        )
      }
      Err(ReleaseError::VersionMismatch(mismatch)) => {
        let help = mismatch.help_message();
        Ok(CheckResult::error(self.name(), mismatch.to_string(), help))
      }
      Err(e) => Err(e),
    }
  }
}

/// First header field value, cleaned the way WordPress reads file headers
pub(crate) fn header_field(re: &Regex, content: &str) -> Option<String> {
  let raw = re.captures(content)?.get(1)?.as_str();
  let cleaned = HEADER_COMMENT_TAIL.replace(raw, "");
  let value = cleaned.trim();
  if value.is_empty() {
    None
  } else {
    Some(value.to_string())
  }
}

fn read(path: &Path) -> ReleaseResult<String> {
  if !path.exists() {
    return Err(missing(path, "file"));
  }
  fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn missing(path: &Path, pattern: &str) -> ReleaseError {
  ReleaseError::Extraction(ExtractionError {
    path: path.to_path_buf(),
    pattern: pattern.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::{PackageManifest, ReleaseConfig};
  use tempfile::TempDir;

  fn plugin(dir: &TempDir, header: &str, internal: &str, readme: &str, manifest: Option<&str>) -> ReleaseContext {
    fs::write(
      dir.path().join("demo.php"),
      format!(
        "<?php\n/**\n * Plugin Name: Demo\n * Version: {}\n */\nclass Demo {{\n  public $version = '{}';\n}}\n",
        header, internal
      ),
    )
    .unwrap();
    fs::write(
      dir.path().join("readme.txt"),
      format!("=== Demo ===\nStable tag: {}\n\n== Description ==\n", readme),
    )
    .unwrap();
    ReleaseContext::from_parts(
      dir.path().to_path_buf(),
      ReleaseConfig::default(),
      PackageManifest {
        name: "demo".to_string(),
        version: manifest.map(String::from),
      },
    )
  }

  #[test]
  fn test_reads_every_source() {
    let dir = TempDir::new().unwrap();
    let ctx = plugin(&dir, "1.2.0", "1.2.0", "1.2.0", Some("1.2.0"));
    let oracle = VersionOracle::new(&ctx);
    for source in [
      VersionSource::Plugin,
      VersionSource::Readme,
      VersionSource::Manifest,
      VersionSource::Internal,
    ] {
      assert_eq!(oracle.read_version(source).unwrap(), "1.2.0", "source {}", source);
    }
  }

  #[test]
  fn test_all_consistent_passes() {
    let dir = TempDir::new().unwrap();
    let ctx = plugin(&dir, "1.2.0", "1.2.0", "1.2.0", Some("1.2.0"));
    let outcomes = check_versions(&ctx).unwrap();
    assert_eq!(outcomes.len(), 3);
  }

  #[test]
  fn test_each_pair_can_fail() {
    let cases = [
      ("1.2.0", "1.2.0", "1.2.1", "1.2.0", "plugin_vs_readme"),
      ("1.2.0", "1.2.0", "1.2.0", "1.3.0", "plugin_vs_manifest"),
      ("1.2.0", "1.2.1", "1.2.0", "1.2.0", "plugin_vs_internal"),
    ];
    for (header, internal, readme, manifest, failing) in cases {
      let dir = TempDir::new().unwrap();
      let ctx = plugin(&dir, header, internal, readme, Some(manifest));
      match check_versions(&ctx) {
        Err(ReleaseError::VersionMismatch(m)) => assert_eq!(m.check, failing),
        other => panic!("expected mismatch for {}, got {:?}", failing, other),
      }
    }
  }

  #[test]
  fn test_equality_is_textual() {
    let dir = TempDir::new().unwrap();
    let ctx = plugin(&dir, "1.2", "1.2", "1.2.0", Some("1.2"));
    assert!(matches!(check_versions(&ctx), Err(ReleaseError::VersionMismatch(_))));
  }

  #[test]
  fn test_missing_internal_constant_is_extraction_error() {
    let dir = TempDir::new().unwrap();
    let ctx = plugin(&dir, "1.0.0", "1.0.0", "1.0.0", Some("1.0.0"));
    fs::write(dir.path().join("demo.php"), "<?php\n/*\n * Version: 1.0.0\n */\n").unwrap();
    let err = VersionOracle::new(&ctx).read_version(VersionSource::Internal).unwrap_err();
    assert!(matches!(err, ReleaseError::Extraction(_)));
  }

  #[test]
  fn test_missing_manifest_version_is_extraction_error() {
    let dir = TempDir::new().unwrap();
    let ctx = plugin(&dir, "1.0.0", "1.0.0", "1.0.0", None);
    assert!(matches!(check_versions(&ctx), Err(ReleaseError::Extraction(_))));
  }

  #[test]
  fn test_header_comment_tail_is_stripped() {
    assert_eq!(
      header_field(&PLUGIN_HEADER_VERSION, "/* Version: 2.0.1 */").as_deref(),
      Some("2.0.1")
    );
  }
}
