use crate::core::config::{PackageManifest, ReleaseConfig};
use crate::core::error::{ReleaseError, ReleaseResult};
use std::path::Path;

/// Write a release.toml with the stock defaults
///
/// The slug is filled in from package.json when one is present.
pub fn run_init(root: &Path, force: bool) -> ReleaseResult<()> {
  if let Some(existing) = ReleaseConfig::find_config_path(root)
    && !force
  {
    return Err(ReleaseError::with_help(
      format!("Configuration already exists: {}", existing.display()),
      "Pass --force to overwrite it with the defaults",
    ));
  }

  let mut config = ReleaseConfig::default();
  let manifest_path = root.join(&config.plugin.manifest);
  match PackageManifest::load(&manifest_path) {
    Ok(manifest) => {
      println!("📦 Found {} in {}", manifest.name, manifest_path.display());
      config.plugin.slug = Some(manifest.name);
    }
    Err(e) => {
      tracing::debug!("no usable manifest: {}", e);
      println!("⚠️  No package.json found; set [plugin] slug by hand");
    }
  }

  let path = config.save(root)?;
  println!("✅ Wrote {}", path.display());
  println!("\n💡 Review the [i18n] headers and [deploy] settings before the first release");
  Ok(())
}
