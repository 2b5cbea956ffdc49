use super::Compression;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::fileset::relative_slash_path;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// `<name>.<version>.zip`
pub fn archive_file_name(name: &str, version: &str) -> String {
  format!("{}.{}.zip", name, version)
}

/// Zip `staging_dir` into `archive_path`, every entry under `<prefix>/`
///
/// Entries are written in sorted path order with fixed timestamps, so the same staged
/// tree always yields the same archive.
pub fn archive(
  staging_dir: &Path,
  archive_path: &Path,
  prefix: &str,
  compression: Compression,
) -> ReleaseResult<PathBuf> {
  if let Some(parent) = archive_path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }

  let file = File::create(archive_path).with_context(|| format!("Failed to create {}", archive_path.display()))?;
  let mut zip = ZipWriter::new(file);

  let file_options = SimpleFileOptions::default()
    .compression_method(compression.method())
    .unix_permissions(0o644);
  let dir_options = SimpleFileOptions::default().unix_permissions(0o755);

  zip.add_directory(format!("{}/", prefix), dir_options)?;

  let mut files = 0usize;
  for entry in WalkDir::new(staging_dir).sort_by_file_name() {
    let entry = entry?;
    let Some(rel) = relative_slash_path(staging_dir, entry.path()) else {
      continue;
    };
    let name = format!("{}/{}", prefix, rel);

    if entry.file_type().is_dir() {
      zip.add_directory(format!("{}/", name), dir_options)?;
    } else if entry.file_type().is_file() {
      let content = fs::read(entry.path()).with_context(|| format!("Failed to read {}", entry.path().display()))?;
      zip.start_file(name, file_options)?;
      zip.write_all(&content)?;
      files += 1;
    }
  }

  zip.finish()?;
  tracing::debug!("archived {} files into {}", files, archive_path.display());
  Ok(archive_path.to_path_buf())
}
