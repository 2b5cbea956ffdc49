//! Localization: keyword specs, call scanning, POT extraction and MO compilation

pub mod catalog;
pub mod extract;
pub mod keywords;
pub mod mo;
pub mod po;
pub mod scanner;

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::fileset::FileSet;
use chrono::{DateTime, Utc};
use extract::CatalogBuilder;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What `make_pot` produced
#[derive(Debug, Clone, Serialize)]
pub struct PotReport {
  pub path: PathBuf,
  pub entries: usize,
  pub excluded: usize,
  pub files_scanned: usize,
  /// False when the existing POT was already up to date
  pub written: bool,
}

/// Extract the plugin's strings and write the POT catalog
pub fn make_pot(ctx: &ReleaseContext, now: DateTime<Utc>) -> ReleaseResult<PotReport> {
  let built = CatalogBuilder::from_context(ctx)?.build(now)?;
  let path = ctx.pot_path();
  let content = built.catalog.to_pot(ctx.slug());
  let written = extract::write_pot(&path, &content, ctx.config.i18n.update_timestamp)?;

  if built.catalog.is_empty() {
    tracing::warn!("no translatable strings found in {} files", built.files_scanned);
  }
  tracing::debug!(
    "catalog: {} entries from {} files, {} excluded",
    built.catalog.len(),
    built.files_scanned,
    built.excluded.len()
  );

  Ok(PotReport {
    path,
    entries: built.catalog.len(),
    excluded: built.excluded.len(),
    files_scanned: built.files_scanned,
    written,
  })
}

/// One compiled PO file
#[derive(Debug, Clone, Serialize)]
pub struct CompiledCatalog {
  pub po: PathBuf,
  pub mo: PathBuf,
  pub messages: usize,
}

/// Compile every PO file in `catalog_dir` matching `pattern` into an MO file beside it
///
/// Existing MO files are overwritten; PO files are left in place.
pub fn compile(catalog_dir: &Path, pattern: &str) -> ReleaseResult<Vec<CompiledCatalog>> {
  if !catalog_dir.is_dir() {
    tracing::warn!("{} does not exist, nothing to compile", catalog_dir.display());
    return Ok(Vec::new());
  }

  let files = FileSet::new(&[pattern])?.collect(catalog_dir)?;
  let mut compiled = Vec::with_capacity(files.len());

  for rel in files {
    let po_path = catalog_dir.join(&rel);
    let content = fs::read_to_string(&po_path).with_context(|| format!("Failed to read {}", po_path.display()))?;
    let messages = po::parse(&content, &rel.to_string_lossy())?;
    let bytes = mo::encode(&messages);

    let mo_path = po_path.with_extension("mo");
    fs::write(&mo_path, &bytes).with_context(|| format!("Failed to write {}", mo_path.display()))?;
    tracing::debug!("compiled {} -> {}", po_path.display(), mo_path.display());

    compiled.push(CompiledCatalog {
      po: po_path,
      mo: mo_path,
      messages: messages.iter().filter(|m| !m.is_header() && !m.fuzzy && m.is_translated()).count(),
    });
  }

  Ok(compiled)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_compile_writes_mo_and_keeps_po() {
    let dir = tempfile::TempDir::new().unwrap();
    let po = dir.path().join("demo-de_DE.po");
    fs::write(&po, "msgid \"\"\nmsgstr \"Language: de_DE\\n\"\n\nmsgid \"Hello\"\nmsgstr \"Hallo\"\n").unwrap();
    fs::write(dir.path().join("demo-de_DE.mo"), b"stale").unwrap();
    fs::write(dir.path().join("demo.pot"), "msgid \"\"\nmsgstr \"\"\n").unwrap();

    let compiled = compile(dir.path(), "*.po").unwrap();
    assert_eq!(compiled.len(), 1);
    assert_eq!(compiled[0].messages, 1);
    assert!(po.exists());

    let mo = fs::read(dir.path().join("demo-de_DE.mo")).unwrap();
    assert_eq!(&mo[0..4], &mo::MO_MAGIC.to_le_bytes());
    assert!(!dir.path().join("demo.mo").exists());
  }

  #[test]
  fn test_compile_missing_dir_is_noop() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(compile(&dir.path().join("languages"), "*.po").unwrap().is_empty());
  }
}
