use crate::assemble::{Compression, LineEnding};
use crate::checks::versions::VersionSource;
use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use crate::i18n::keywords::KeywordSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for wp-release
/// Searched in order: release.toml, .release.toml, .config/release.toml
///
/// Every section is optional. A plugin without any release.toml gets the stock
/// WordPress.org release setup, keyed off the `name` in package.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseConfig {
  #[serde(default)]
  pub plugin: PluginConfig,
  #[serde(default)]
  pub versions: VersionsConfig,
  #[serde(default)]
  pub audit: AuditConfig,
  #[serde(default)]
  pub i18n: I18nConfig,
  #[serde(default)]
  pub readme: ReadmeConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub deploy: DeployConfig,
}

/// Where the plugin's identity lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
  /// Plugin slug (default: `name` from package.json)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub slug: Option<String>,

  /// Main plugin file carrying the header (default: `<slug>.php`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub main_file: Option<PathBuf>,

  /// Text domain for localization calls (default: slug)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text_domain: Option<String>,

  /// WordPress.org readme (default: readme.txt)
  #[serde(default = "default_readme_path")]
  pub readme: PathBuf,

  /// Package manifest (default: package.json)
  #[serde(default = "default_manifest_path")]
  pub manifest: PathBuf,
}

fn default_readme_path() -> PathBuf {
  PathBuf::from("readme.txt")
}

fn default_manifest_path() -> PathBuf {
  PathBuf::from("package.json")
}

impl Default for PluginConfig {
  fn default() -> Self {
    Self {
      slug: None,
      main_file: None,
      text_domain: None,
      readme: default_readme_path(),
      manifest: default_manifest_path(),
    }
  }
}

/// Pairwise version equality checks run before every build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsConfig {
  #[serde(default = "default_version_checks")]
  pub checks: Vec<VersionCheckConfig>,
}

/// One equality assertion between two version sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCheckConfig {
  pub name: String,
  pub left: VersionSource,
  pub right: VersionSource,
}

fn default_version_checks() -> Vec<VersionCheckConfig> {
  vec![
    VersionCheckConfig {
      name: "plugin_vs_readme".to_string(),
      left: VersionSource::Plugin,
      right: VersionSource::Readme,
    },
    VersionCheckConfig {
      name: "plugin_vs_manifest".to_string(),
      left: VersionSource::Plugin,
      right: VersionSource::Manifest,
    },
    VersionCheckConfig {
      name: "plugin_vs_internal".to_string(),
      left: VersionSource::Plugin,
      right: VersionSource::Internal,
    },
  ]
}

impl Default for VersionsConfig {
  fn default() -> Self {
    Self {
      checks: default_version_checks(),
    }
  }
}

/// Text-domain audit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
  /// Files to audit (glob patterns, `!` excludes)
  #[serde(default = "default_audit_files")]
  pub files: Vec<String>,

  /// Report calls that do not pass a text domain at all
  #[serde(default = "default_true")]
  pub report_missing: bool,

  /// Treat any finding as a failure
  #[serde(default)]
  pub strict: bool,
}

fn default_true() -> bool {
  true
}

fn default_audit_files() -> Vec<String> {
  vec!["**/*.php".to_string(), "!node_modules/**".to_string(), "!build/**".to_string()]
}

impl Default for AuditConfig {
  fn default() -> Self {
    Self {
      files: default_audit_files(),
      report_missing: true,
      strict: false,
    }
  }
}

/// Translation catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
  /// Localization keywords in `name:1,2c,3d` notation, shared by audit and extraction
  #[serde(default = "default_keywords")]
  pub keywords: Vec<String>,

  /// Directory holding the POT, PO and MO files
  #[serde(default = "default_languages_dir")]
  pub languages_dir: PathBuf,

  /// POT file name (default: `<slug>.pot`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pot_filename: Option<String>,

  /// Files scanned for translatable strings
  #[serde(default = "default_extract_files")]
  pub files: Vec<String>,

  /// Catalog headers forced over the generated ones
  #[serde(default = "default_header_overrides")]
  pub headers: BTreeMap<String, String>,

  /// Entries whose text is listed here are dropped from the catalog
  #[serde(default = "default_excluded_strings")]
  pub excluded_strings: Vec<String>,

  /// Entries carrying one of these extracted comments are dropped from the catalog
  #[serde(default = "default_excluded_meta")]
  pub excluded_meta: Vec<String>,

  /// Rewrite the POT even when only its creation date would change
  #[serde(default = "default_true")]
  pub update_timestamp: bool,

  /// PO files compiled into MO files, matched inside `languages_dir`
  #[serde(default = "default_compile_pattern")]
  pub compile_pattern: String,

  /// Command pushing the POT to the translation service (empty = skip)
  #[serde(default = "default_push_command")]
  pub push: Vec<String>,

  /// Command pulling translated PO files back (empty = skip)
  #[serde(default = "default_pull_command")]
  pub pull: Vec<String>,
}

fn default_keywords() -> Vec<String> {
  [
    "__:1,2d",
    "_e:1,2d",
    "_x:1,2c,3d",
    "esc_html__:1,2d",
    "esc_html_e:1,2d",
    "esc_html_x:1,2c,3d",
    "esc_attr__:1,2d",
    "esc_attr_e:1,2d",
    "esc_attr_x:1,2c,3d",
    "_ex:1,2c,3d",
    "_n:1,2,4d",
    "_nx:1,2,4c,5d",
    "_n_noop:1,2,3d",
    "_nx_noop:1,2,3c,4d",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect()
}

fn default_languages_dir() -> PathBuf {
  PathBuf::from("languages")
}

fn default_extract_files() -> Vec<String> {
  vec!["**/*.php".to_string(), "!build/**".to_string(), "!node_modules/**".to_string()]
}

fn default_header_overrides() -> BTreeMap<String, String> {
  [
    ("Report-Msgid-Bugs-To", "https://github.com/WPStore/wpmu-plugin-stats/issues"),
    ("Plural-Forms", "nplurals=2; plural=n != 1;"),
    ("Last-Translator", "WPStore.io <code@wpstore.io>"),
    ("Language-Team", "WPStore.io <code@wpstore.io>"),
    ("X-Poedit-Basepath", "."),
    ("X-Poedit-Language", "English"),
    ("X-Poedit-Country", "United States"),
    ("X-Poedit-SourceCharset", "utf-8"),
    (
      "X-Poedit-KeywordsList",
      "__;_e;__ngettext:1,2;_n:1,2;__ngettext_noop:1,2;_n_noop:1,2;_c,_nc:4c,1,2;_x:1,2c;_ex:1,2c;_nx:4c,1,2;_nx_noop:4c,1,2;",
    ),
    ("X-Poedit-Bookmarks", ""),
    ("X-Poedit-SearchPath-0", "."),
    ("X-Textdomain-Support", "yes"),
  ]
  .iter()
  .map(|(k, v)| (k.to_string(), v.to_string()))
  .collect()
}

fn default_excluded_strings() -> Vec<String> {
  vec!["Yes".to_string(), "No".to_string()]
}

fn default_excluded_meta() -> Vec<String> {
  vec![
    "Plugin Name of the plugin/theme".to_string(),
    "Author of the plugin/theme".to_string(),
    "Author URI of the plugin/theme".to_string(),
  ]
}

fn default_compile_pattern() -> String {
  "*.po".to_string()
}

fn default_push_command() -> Vec<String> {
  vec!["tx".to_string(), "push".to_string(), "-s".to_string()]
}

fn default_pull_command() -> Vec<String> {
  vec![
    "tx".to_string(),
    "pull".to_string(),
    "-a".to_string(),
    "--minimum-perc=90".to_string(),
  ]
}

impl Default for I18nConfig {
  fn default() -> Self {
    Self {
      keywords: default_keywords(),
      languages_dir: default_languages_dir(),
      pot_filename: None,
      files: default_extract_files(),
      headers: default_header_overrides(),
      excluded_strings: default_excluded_strings(),
      excluded_meta: default_excluded_meta(),
      update_timestamp: true,
      compile_pattern: default_compile_pattern(),
      push: default_push_command(),
      pull: default_pull_command(),
    }
  }
}

/// readme.txt -> README.md conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeConfig {
  #[serde(default = "default_readme_output")]
  pub output: PathBuf,

  /// Screenshot URL template with `{plugin}` and `{screenshot}` placeholders
  #[serde(default = "default_screenshot_url")]
  pub screenshot_url: String,
}

fn default_readme_output() -> PathBuf {
  PathBuf::from("README.md")
}

fn default_screenshot_url() -> String {
  "https://raw.githubusercontent.com/wpstore/{plugin}/develop/.assets/{screenshot}.png".to_string()
}

impl Default for ReadmeConfig {
  fn default() -> Self {
    Self {
      output: default_readme_output(),
      screenshot_url: default_screenshot_url(),
    }
  }
}

/// Staging, line endings and archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Build output directory; staging happens in `<dir>/<slug>`
  #[serde(default = "default_build_dir")]
  pub dir: PathBuf,

  /// Files copied into the staging directory
  #[serde(default = "default_build_files")]
  pub files: Vec<String>,

  /// Canonical line ending for staged text files
  #[serde(default)]
  pub eol: LineEnding,

  /// Staged files whose line endings are normalized
  #[serde(default = "default_eol_files")]
  pub eol_files: Vec<String>,

  /// Zip compression method
  #[serde(default)]
  pub compression: Compression,
}

fn default_build_dir() -> PathBuf {
  PathBuf::from("build")
}

fn default_build_files() -> Vec<String> {
  [
    "**",
    "!.tx/**",
    "!.assets/**",
    "!.git/**",
    "!.gitignore",
    "!.gitmodules",
    "!.jshintrc",
    "!.scrutinizer.yml",
    "!node_modules/**",
    "!build/**",
    "!Gruntfile.js",
    "!package.json",
    "!package-lock.json",
    "!release.toml",
    "!.release.toml",
    "!.config/**",
    "!LICENSE",
    "!README.md",
    "!nbproject/**",
    "!**/*.LCK",
    "!**/_notes/**",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect()
}

fn default_eol_files() -> Vec<String> {
  vec!["**/*.{php,css,js,po,txt}".to_string()]
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      dir: default_build_dir(),
      files: default_build_files(),
      eol: LineEnding::default(),
      eol_files: default_eol_files(),
      compression: Compression::default(),
    }
  }
}

/// WordPress.org SVN deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
  /// Repository URL template; `{slug}` is replaced by the plugin slug
  #[serde(default = "default_svn_url")]
  pub svn_url: String,

  /// SVN username passed to `svn commit`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub svn_user: Option<String>,

  /// Directory mirrored into the repository's `assets/`
  #[serde(default = "default_assets_dir")]
  pub assets_dir: PathBuf,

  /// Checkout location (default: `<build.dir>/svn`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub checkout_dir: Option<PathBuf>,
}

fn default_svn_url() -> String {
  "https://plugins.svn.wordpress.org/{slug}/".to_string()
}

fn default_assets_dir() -> PathBuf {
  PathBuf::from(".assets")
}

impl Default for DeployConfig {
  fn default() -> Self {
    Self {
      svn_url: default_svn_url(),
      svn_user: None,
      assets_dir: default_assets_dir(),
      checkout_dir: None,
    }
  }
}

impl ReleaseConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("release.toml"),
      path.join(".release.toml"),
      path.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  ///
  /// A file that exists but does not parse or validate is an error.
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!("no release.toml found in {}, using defaults", path.display());
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    tracing::debug!("loaded config from {}", config_path.display());
    Ok(config)
  }

  /// Save config to release.toml (default location)
  pub fn save(&self, path: &Path) -> ReleaseResult<PathBuf> {
    let config_path = path.join("release.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }

  /// Validate values serde cannot check on its own
  pub fn validate(&self) -> ReleaseResult<()> {
    if let Some(slug) = &self.plugin.slug
      && slug.trim().is_empty()
    {
      return Err(ReleaseError::Config(ConfigError::InvalidValue {
        field: "plugin.slug".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    for keyword in &self.i18n.keywords {
      KeywordSpec::parse(keyword).map_err(|reason| {
        ReleaseError::Config(ConfigError::InvalidValue {
          field: "i18n.keywords".to_string(),
          reason,
        })
      })?;
    }

    let mut names: Vec<&str> = self.versions.checks.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    if names.windows(2).any(|w| w[0] == w[1]) {
      return Err(ReleaseError::Config(ConfigError::InvalidValue {
        field: "versions.checks".to_string(),
        reason: "check names must be unique".to_string(),
      }));
    }

    if !self.readme.screenshot_url.contains("{screenshot}") {
      return Err(ReleaseError::with_help(
        "readme.screenshot_url has no {screenshot} placeholder",
        "Every screenshot would resolve to the same URL; add {screenshot} to the template",
      ));
    }

    Ok(())
  }

  /// Parsed keyword table (validated on load)
  pub fn keyword_specs(&self) -> ReleaseResult<Vec<KeywordSpec>> {
    self
      .i18n
      .keywords
      .iter()
      .map(|k| {
        KeywordSpec::parse(k).map_err(|reason| {
          ReleaseError::Config(ConfigError::InvalidValue {
            field: "i18n.keywords".to_string(),
            reason,
          })
        })
      })
      .collect()
  }
}

/// The subset of package.json the pipeline reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManifest {
  pub name: String,
  #[serde(default)]
  pub version: Option<String>,
}

impl PackageManifest {
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    if !path.exists() {
      return Err(ReleaseError::Config(ConfigError::ManifestNotFound {
        path: path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: PackageManifest =
      serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    if manifest.name.trim().is_empty() {
      return Err(ReleaseError::Config(ConfigError::MissingField {
        field: format!("name in {}", path.display()),
      }));
    }

    Ok(manifest)
  }
}
