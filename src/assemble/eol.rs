use super::LineEnding;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::fileset::FileSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Rewrite every line break (`\r\n`, `\r`, `\n`) as `eol`
pub fn normalize(content: &[u8], eol: LineEnding) -> Vec<u8> {
  let target = eol.as_bytes();
  let mut out = Vec::with_capacity(content.len());
  let mut i = 0;
  while i < content.len() {
    match content[i] {
      b'\r' => {
        out.extend_from_slice(target);
        if content.get(i + 1) == Some(&b'\n') {
          i += 1;
        }
      }
      b'\n' => out.extend_from_slice(target),
      b => out.push(b),
    }
    i += 1;
  }
  out
}

/// Normalize line endings of the selected files under `dir` in place
///
/// Files that already use `eol` throughout are left untouched. Returns the rewritten
/// relative paths.
pub fn normalize_line_endings(dir: &Path, files: &FileSet, eol: LineEnding) -> ReleaseResult<Vec<PathBuf>> {
  let mut rewritten = Vec::new();

  for rel in files.collect(dir)? {
    let path = dir.join(&rel);
    let content = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let normalized = normalize(&content, eol);
    if normalized != content {
      fs::write(&path, &normalized).with_context(|| format!("Failed to write {}", path.display()))?;
      tracing::debug!("normalized line endings in {}", rel.display());
      rewritten.push(rel);
    }
  }

  Ok(rewritten)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_normalize_mixed_input() {
    let mixed = b"a\r\nb\rc\nd";
    assert_eq!(normalize(mixed, LineEnding::Lf), b"a\nb\nc\nd");
    assert_eq!(normalize(mixed, LineEnding::Crlf), b"a\r\nb\r\nc\r\nd");
    assert_eq!(normalize(mixed, LineEnding::Cr), b"a\rb\rc\rd");
  }

  #[test]
  fn test_only_canonical_endings_remain() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.php"), "<?php\r\necho 1;\r\n").unwrap();
    fs::write(dir.path().join("b.css"), "a{}\n").unwrap();
    fs::write(dir.path().join("logo.png"), b"\x89PNG\r\n\x1a\n").unwrap();

    let files = FileSet::new(&["**/*.{php,css,js,po,txt}"]).unwrap();
    let rewritten = normalize_line_endings(dir.path(), &files, LineEnding::Lf).unwrap();

    assert_eq!(rewritten, vec![PathBuf::from("a.php")]);
    assert_eq!(fs::read(dir.path().join("a.php")).unwrap(), b"<?php\necho 1;\n");
    // binary files are not selected
    assert_eq!(fs::read(dir.path().join("logo.png")).unwrap(), b"\x89PNG\r\n\x1a\n");
  }
}
