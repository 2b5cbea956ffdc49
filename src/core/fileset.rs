//! Glob-based file selection shared by audit, extraction, staging and normalization
//!
//! Patterns are matched against `/`-separated paths relative to the tree root.
//! A leading `!` marks an exclusion. Exclusions always win over inclusions, whatever
//! their position in the list.

use crate::core::error::{ReleaseError, ReleaseResult};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

/// Compiled include/exclude pattern list
#[derive(Debug, Clone, Default)]
pub struct FileSet {
  includes: Vec<Pattern>,
  excludes: Vec<Pattern>,
  /// Exclusions of the form `<dir>/**`, reduced to `<dir>`, used to prune walks
  dir_excludes: Vec<Pattern>,
}

impl FileSet {
  /// Compile a pattern list (`!` prefix = exclude, `{a,b}` alternation allowed)
  pub fn new<S: AsRef<str>>(patterns: &[S]) -> ReleaseResult<Self> {
    let mut set = FileSet::default();

    for raw in patterns {
      let raw = raw.as_ref().trim();
      if raw.is_empty() {
        continue;
      }

      let (negated, body) = match raw.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, raw),
      };

      for expanded in expand_braces(body) {
        let pattern = Pattern::new(&expanded)
          .map_err(|e| ReleaseError::message(format!("Invalid file pattern '{}': {}", raw, e)))?;

        if negated {
          if let Some(dir) = expanded.strip_suffix("/**")
            && !dir.is_empty()
          {
            set.dir_excludes.push(Pattern::new(dir)?);
          }
          set.excludes.push(pattern);
        } else {
          set.includes.push(pattern);
        }
      }
    }

    Ok(set)
  }

  /// Whether a relative file path is selected
  pub fn matches(&self, rel: &str) -> bool {
    self.includes.iter().any(|p| p.matches_with(rel, MATCH_OPTIONS))
      && !self.excludes.iter().any(|p| p.matches_with(rel, MATCH_OPTIONS))
  }

  /// Whether a whole directory is excluded (never descended into)
  pub fn excludes_dir(&self, rel: &str) -> bool {
    self.dir_excludes.iter().any(|p| p.matches_with(rel, MATCH_OPTIONS))
  }

  /// Walk `root` and return matched files as relative paths, sorted
  pub fn collect(&self, root: &Path) -> ReleaseResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
          return true;
        }
        match relative_slash_path(root, entry.path()) {
          Some(rel) => !self.excludes_dir(&rel),
          None => true,
        }
      });

    for entry in walker {
      let entry = entry?;
      if !entry.file_type().is_file() {
        continue;
      }
      let Some(rel) = relative_slash_path(root, entry.path()) else {
        continue;
      };
      if self.matches(&rel) {
        files.push(PathBuf::from(rel));
      }
    }

    Ok(files)
  }
}

/// Relative path with `/` separators regardless of platform
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
  let rel = path.strip_prefix(root).ok()?;
  let parts: Vec<String> = rel
    .components()
    .map(|c| c.as_os_str().to_string_lossy().into_owned())
    .collect();
  if parts.is_empty() {
    return None;
  }
  Some(parts.join("/"))
}

/// Expand `{a,b}` alternations; groups do not nest
fn expand_braces(pattern: &str) -> Vec<String> {
  let Some(open) = pattern.find('{') else {
    return vec![pattern.to_string()];
  };
  let Some(close_offset) = pattern[open..].find('}') else {
    return vec![pattern.to_string()];
  };
  let close = open + close_offset;

  let prefix = &pattern[..open];
  let suffix = &pattern[close + 1..];
  pattern[open + 1..close]
    .split(',')
    .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt, suffix)))
    .collect()
}
