//! WordPress.org plugin registry deployment over SVN
//!
//! The registry is an SVN repository with `trunk/`, `tags/<version>/` and `assets/`.
//! A deploy mirrors the staged build into `trunk/`, the assets directory into
//! `assets/`, tags the trunk as the released version and commits.

mod artifact;

pub use artifact::BuildArtifact;

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::core::tools::{ToolCommand, ToolRunner};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a deploy did
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
  pub url: String,
  pub version: String,
  pub checkout: PathBuf,
  pub deleted: Vec<String>,
  pub assets: bool,
}

pub struct Deployer<'a, R: ToolRunner> {
  ctx: &'a ReleaseContext,
  runner: &'a R,
}

impl<'a, R: ToolRunner> Deployer<'a, R> {
  pub fn new(ctx: &'a ReleaseContext, runner: &'a R) -> Self {
    Self { ctx, runner }
  }

  /// Repository URL with `{slug}` resolved
  pub fn svn_url(&self) -> String {
    self.ctx.config.deploy.svn_url.replace("{slug}", self.ctx.slug())
  }

  /// Push a built artifact to the registry, tagged by its version
  pub fn deploy(&self, artifact: &BuildArtifact) -> ReleaseResult<DeployReport> {
    let url = self.svn_url();
    let checkout = self.ctx.svn_checkout_dir();
    let version = artifact.version();

    if checkout.exists() {
      fs::remove_dir_all(&checkout).with_context(|| format!("Failed to remove {}", checkout.display()))?;
    }
    if let Some(parent) = checkout.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tracing::info!("checking out {}", url);
    self
      .runner
      .run(&ToolCommand::new("svn").arg("checkout").arg(&url).arg(checkout.to_string_lossy()))?;

    let tag = checkout.join("tags").join(version);
    if tag.exists() {
      return Err(ReleaseError::with_help(
        format!("Tag {} already exists in {}", version, url),
        "Bump the version before deploying; released tags are never overwritten",
      ));
    }

    let trunk = checkout.join("trunk");
    replace_dir(artifact.staging_dir(), &trunk)?;

    let assets_src = self.ctx.root.join(&self.ctx.config.deploy.assets_dir);
    let assets = assets_src.is_dir();
    if assets {
      replace_dir(&assets_src, &checkout.join("assets"))?;
    } else {
      tracing::debug!("no assets directory at {}, skipped", assets_src.display());
    }

    let svn = |args: &[&str]| ToolCommand::new("svn").args(args.iter().copied()).current_dir(&checkout);

    let mut add_targets = vec!["add", "--force", "--auto-props", "--parents", "--depth", "infinity", "-q", "trunk"];
    if assets {
      add_targets.push("assets");
    }
    self.runner.run(&svn(&add_targets))?;

    let status = self.runner.run(&svn(&["status"]))?;
    let deleted = missing_paths(&status);
    for path in &deleted {
      self.runner.run(&svn(&["delete", "--force", "-q"]).arg(path))?;
    }

    let tag_path = format!("tags/{}", version);
    self.runner.run(&svn(&["copy", "trunk"]).arg(&tag_path))?;

    let mut commit = svn(&["commit", "-m"]).arg(format!("Tagging version {}", version));
    if let Some(user) = &self.ctx.config.deploy.svn_user {
      commit = commit.arg("--username").arg(user);
    }
    tracing::info!("committing version {}", version);
    self.runner.run(&commit)?;

    Ok(DeployReport {
      url,
      version: version.to_string(),
      checkout,
      deleted,
      assets,
    })
  }
}

/// Paths `svn status` reports as missing (`!`): deleted locally, still versioned
///
/// Status lines are seven flag columns and a space, then the path.
fn missing_paths(status: &str) -> Vec<String> {
  status
    .lines()
    .filter(|line| line.starts_with('!'))
    .filter_map(|line| line.get(8..))
    .map(|path| path.trim().to_string())
    .filter(|path| !path.is_empty())
    .collect()
}

/// Make `dest` mirror `src`, keeping `dest`'s `.svn` metadata
fn replace_dir(src: &Path, dest: &Path) -> ReleaseResult<()> {
  if dest.is_dir() {
    for entry in fs::read_dir(dest).with_context(|| format!("Failed to read {}", dest.display()))? {
      let entry = entry?;
      if entry.file_name() == ".svn" {
        continue;
      }
      let path = entry.path();
      if entry.file_type()?.is_dir() {
        fs::remove_dir_all(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
      } else {
        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
      }
    }
  }
  fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

  for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
    let entry = entry?;
    let rel = entry.path().strip_prefix(src)?;
    let target = dest.join(rel);
    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).with_context(|| format!("Failed to create {}", target.display()))?;
    } else if entry.file_type().is_file() {
      fs::copy(entry.path(), &target)
        .with_context(|| format!("Failed to copy {} to {}", entry.path().display(), target.display()))?;
    }
  }
  Ok(())
}
