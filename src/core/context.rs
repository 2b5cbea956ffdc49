//! Release context - build once, pass everywhere
//!
//! `ReleaseContext` bundles the working tree root, the parsed release.toml and the
//! package manifest. It is built once in main.rs and handed by reference to every
//! command and pipeline task; nothing mutates it afterwards.

use crate::core::config::{PackageManifest, ReleaseConfig};
use crate::core::error::ReleaseResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared, read-only view of the plugin being released
#[derive(Debug, Clone)]
pub struct ReleaseContext {
  /// Working tree root (absolute path)
  pub root: PathBuf,

  /// Release configuration (release.toml or defaults)
  pub config: Arc<ReleaseConfig>,

  /// package.json
  pub manifest: PackageManifest,
}

impl ReleaseContext {
  /// Load config and manifest from a working tree
  pub fn build(root: &Path) -> ReleaseResult<Self> {
    let root = root.to_path_buf();
    let config = ReleaseConfig::load(&root)?;
    let manifest = PackageManifest::load(&root.join(&config.plugin.manifest))?;

    Ok(Self {
      root,
      config: Arc::new(config),
      manifest,
    })
  }

  /// Assemble a context without reading release.toml or package.json
  #[cfg(test)]
  pub fn from_parts(root: PathBuf, config: ReleaseConfig, manifest: PackageManifest) -> Self {
    Self {
      root,
      config: Arc::new(config),
      manifest,
    }
  }

  /// Plugin slug: configured, else the package name
  pub fn slug(&self) -> &str {
    self.config.plugin.slug.as_deref().unwrap_or(&self.manifest.name)
  }

  /// Text domain: configured, else the slug
  pub fn text_domain(&self) -> &str {
    self.config.plugin.text_domain.as_deref().unwrap_or_else(|| self.slug())
  }

  /// Main plugin file relative to the root
  pub fn main_file(&self) -> PathBuf {
    self
      .config
      .plugin
      .main_file
      .clone()
      .unwrap_or_else(|| PathBuf::from(format!("{}.php", self.slug())))
  }

  pub fn readme_path(&self) -> PathBuf {
    self.root.join(&self.config.plugin.readme)
  }

  pub fn languages_dir(&self) -> PathBuf {
    self.root.join(&self.config.i18n.languages_dir)
  }

  /// POT output path: `<languages_dir>/<pot_filename>`
  pub fn pot_path(&self) -> PathBuf {
    let name = self
      .config
      .i18n
      .pot_filename
      .clone()
      .unwrap_or_else(|| format!("{}.pot", self.slug()));
    self.languages_dir().join(name)
  }

  pub fn build_dir(&self) -> PathBuf {
    self.root.join(&self.config.build.dir)
  }

  /// Staging directory: `<build>/<package name>`
  pub fn staging_dir(&self) -> PathBuf {
    self.build_dir().join(&self.manifest.name)
  }

  pub fn svn_checkout_dir(&self) -> PathBuf {
    match &self.config.deploy.checkout_dir {
      Some(dir) => self.root.join(dir),
      None => self.build_dir().join("svn"),
    }
  }

  /// Get working tree root as Path reference (convenience)
  pub fn root(&self) -> &Path {
    &self.root
  }
}
