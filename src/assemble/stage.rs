use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::fileset::FileSet;
use crate::ui::progress::{self, FileProgress};
use std::fs;
use std::path::{Path, PathBuf};

/// Remove and recreate a staging directory
pub fn clean(dest: &Path) -> ReleaseResult<()> {
  if dest.exists() {
    fs::remove_dir_all(dest).with_context(|| format!("Failed to remove {}", dest.display()))?;
  }
  fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;
  Ok(())
}

/// Copy every selected file of `root` into `dest`, keeping relative paths
///
/// Only files are copied; directories exist in `dest` only as parents of files. Files
/// inside `dest` itself are never selected. Returns the staged relative paths.
pub fn stage(root: &Path, files: &FileSet, dest: &Path) -> ReleaseResult<Vec<PathBuf>> {
  let selected: Vec<PathBuf> = files
    .collect(root)?
    .into_iter()
    .filter(|rel| !root.join(rel).starts_with(dest))
    .collect();

  let mut bar = FileProgress::maybe(selected.len(), format!("Staging {} files", selected.len()));
  for rel in &selected {
    let from = root.join(rel);
    let to = dest.join(rel);
    if let Some(parent) = to.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(&from, &to).with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    progress::tick(&mut bar);
  }

  tracing::debug!("staged {} files into {}", selected.len(), dest.display());
  Ok(selected)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("inc/empty")).unwrap();
    fs::create_dir_all(root.join("node_modules/x")).unwrap();
    fs::write(root.join("a.php"), "<?php\n").unwrap();
    fs::write(root.join(".git/config"), "[core]\n").unwrap();
    fs::write(root.join("inc/b.php"), "<?php\n").unwrap();
    fs::write(root.join("node_modules/x/index.js"), "").unwrap();
    dir
  }

  #[test]
  fn test_stage_included_minus_excluded() {
    let dir = tree();
    let dest = dir.path().join("build/demo");
    clean(&dest).unwrap();

    let files = FileSet::new(&["**", "!.git/**", "!node_modules/**", "!build/**"]).unwrap();
    let staged = stage(dir.path(), &files, &dest).unwrap();

    assert_eq!(staged, vec![PathBuf::from("a.php"), PathBuf::from("inc/b.php")]);
    assert!(dest.join("a.php").is_file());
    assert!(dest.join("inc/b.php").is_file());
    assert!(!dest.join(".git").exists());
    assert!(!dest.join("inc/empty").exists());
  }

  #[test]
  fn test_stage_never_copies_into_itself() {
    let dir = tree();
    let dest = dir.path().join("build/demo");
    clean(&dest).unwrap();
    fs::write(dest.join("stale.php"), "").unwrap();

    // no build/** exclusion on purpose
    let files = FileSet::new(&["**/*.php"]).unwrap();
    let staged = stage(dir.path(), &files, &dest).unwrap();
    assert!(!staged.iter().any(|p| p.starts_with("build")));
  }

  #[test]
  fn test_clean_removes_previous_output() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("build/demo");
    fs::create_dir_all(dest.join("old")).unwrap();
    fs::write(dest.join("old/file.php"), "").unwrap();

    clean(&dest).unwrap();
    assert!(dest.is_dir());
    assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
  }
}
