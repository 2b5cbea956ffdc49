use serde::Serialize;
use std::path::{Path, PathBuf};

/// Proof of a finished build: the staged tree, its archive and the package.json version
///
/// Only the build chain's archive step creates one, so a deploy cannot run against a
/// tree that skipped the version checks.
#[derive(Debug, Clone, Serialize)]
pub struct BuildArtifact {
  staging_dir: PathBuf,
  archive: PathBuf,
  version: String,
}

impl BuildArtifact {
  pub(crate) fn new(staging_dir: PathBuf, archive: PathBuf, version: String) -> Self {
    Self {
      staging_dir,
      archive,
      version,
    }
  }

  pub fn staging_dir(&self) -> &Path {
    &self.staging_dir
  }

  pub fn archive(&self) -> &Path {
    &self.archive
  }

  pub fn version(&self) -> &str {
    &self.version
  }
}
