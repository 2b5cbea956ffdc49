//! Translatable string extraction into a POT catalog

use crate::checks::versions::header_field;
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::fileset::FileSet;
use crate::i18n::catalog::{Catalog, ExclusionReason, ExclusionRules, TranslationEntry};
use crate::i18n::keywords::KeywordSpec;
use crate::i18n::scanner::{self, Call};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Plugin header fields that become catalog entries
pub const PLUGIN_HEADER_FIELDS: [&str; 5] = ["Plugin Name", "Plugin URI", "Description", "Author", "Author URI"];

/// Timestamp format of `POT-Creation-Date`
pub const POT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

/// Everything needed to build one catalog
pub struct CatalogBuilder<'a> {
  pub root: &'a Path,
  pub files: FileSet,
  pub keywords: Vec<KeywordSpec>,
  /// Main plugin file (relative), read for header entries
  pub plugin_file: Option<PathBuf>,
  pub slug: String,
  pub header_overrides: BTreeMap<String, String>,
  pub rules: ExclusionRules,
}

/// Result of a build: the catalog and what the exclusion filter removed
#[derive(Debug)]
pub struct BuiltCatalog {
  pub catalog: Catalog,
  pub excluded: Vec<ExclusionReason>,
  pub files_scanned: usize,
}

impl<'a> CatalogBuilder<'a> {
  pub fn from_context(ctx: &'a ReleaseContext) -> ReleaseResult<Self> {
    let i18n = &ctx.config.i18n;
    Ok(Self {
      root: ctx.root(),
      files: FileSet::new(&i18n.files)?,
      keywords: ctx.config.keyword_specs()?,
      plugin_file: Some(ctx.main_file()),
      slug: ctx.slug().to_string(),
      header_overrides: i18n.headers.clone(),
      rules: ExclusionRules {
        excluded_strings: i18n.excluded_strings.clone(),
        excluded_meta: i18n.excluded_meta.clone(),
      },
    })
  }

  pub fn build(&self, now: DateTime<Utc>) -> ReleaseResult<BuiltCatalog> {
    let mut catalog = Catalog::new();
    let specs: HashMap<&str, &KeywordSpec> = self.keywords.iter().map(|k| (k.name.as_str(), k)).collect();
    let names: HashSet<&str> = specs.keys().copied().collect();

    let files = self.files.collect(self.root)?;
    for rel in &files {
      let path = self.root.join(rel);
      let source = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
      let source = String::from_utf8_lossy(&source);
      let reference_path = rel.to_string_lossy().replace('\\', "/");

      for call in scanner::find_calls(&scanner::tokenize(&source), &names) {
        let Some(spec) = specs.get(call.name.as_str()) else {
          continue;
        };
        if let Some(entry) = entry_from_call(&call, spec, &reference_path) {
          catalog.add(entry);
        }
      }
    }

    let plugin_headers = self.plugin_headers()?;
    for (field, value) in &plugin_headers {
      let mut entry = TranslationEntry::new(value.clone());
      entry.extracted_comments.push(format!("{} of the plugin/theme", field));
      catalog.add(entry);
    }

    let excluded = catalog.apply_exclusions(&self.rules);
    for reason in &excluded {
      match reason {
        ExclusionReason::String(text) => tracing::info!("excluded string from catalog: {:?}", text),
        ExclusionReason::Meta(meta) => tracing::info!("excluded entry by meta: {}", meta),
      }
    }

    let plugin_name = plugin_headers
      .iter()
      .find(|(field, _)| *field == "Plugin Name")
      .map(|(_, value)| value.clone())
      .unwrap_or_else(|| self.slug.clone());
    let version = self.plugin_version()?;

    let project = match version {
      Some(version) => format!("{} {}", plugin_name, version),
      None => plugin_name,
    };
    catalog.set_header("Project-Id-Version", &project);
    catalog.set_header(
      "Report-Msgid-Bugs-To",
      &format!("https://wordpress.org/support/plugin/{}", self.slug),
    );
    catalog.set_header("POT-Creation-Date", &now.format(POT_DATE_FORMAT).to_string());
    catalog.set_header("MIME-Version", "1.0");
    catalog.set_header("Content-Type", "text/plain; charset=UTF-8");
    catalog.set_header("Content-Transfer-Encoding", "8bit");
    catalog.set_header("PO-Revision-Date", "YEAR-MO-DA HO:MI+ZONE");
    catalog.set_header("Last-Translator", "FULL NAME <EMAIL@ADDRESS>");
    catalog.set_header("Language-Team", "LANGUAGE <LL@li.org>");
    for (name, value) in &self.header_overrides {
      catalog.set_header(name, value);
    }

    Ok(BuiltCatalog {
      catalog,
      excluded,
      files_scanned: files.len(),
    })
  }

  fn plugin_source(&self) -> ReleaseResult<Option<String>> {
    let Some(rel) = &self.plugin_file else {
      return Ok(None);
    };
    let path = self.root.join(rel);
    if !path.is_file() {
      tracing::warn!("plugin file {} not found, no header entries extracted", path.display());
      return Ok(None);
    }
    let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(content))
  }

  fn plugin_headers(&self) -> ReleaseResult<Vec<(&'static str, String)>> {
    let Some(source) = self.plugin_source()? else {
      return Ok(Vec::new());
    };
    let mut headers = Vec::new();
    for field in PLUGIN_HEADER_FIELDS {
      let re = header_regex(field)?;
      if let Some(value) = header_field(&re, &source) {
        headers.push((field, value));
      }
    }
    Ok(headers)
  }

  fn plugin_version(&self) -> ReleaseResult<Option<String>> {
    let Some(source) = self.plugin_source()? else {
      return Ok(None);
    };
    Ok(header_field(&header_regex("Version")?, &source))
  }
}

fn header_regex(field: &str) -> ReleaseResult<Regex> {
  Ok(Regex::new(&format!(r"(?mi)^[ \t/*#@]*{}:(.*)$", regex::escape(field)))?)
}

/// Turn one call into an entry; `None` when the text is not a usable literal
fn entry_from_call(call: &Call, spec: &KeywordSpec, path: &str) -> Option<TranslationEntry> {
  let arg = |position: usize| call.args.get(position - 1).and_then(|a| a.literal());

  let Some(text) = arg(spec.text).filter(|t| !t.is_empty()) else {
    tracing::trace!("{}:{} {}() has no literal text, skipped", path, call.line, call.name);
    return None;
  };

  let mut entry = TranslationEntry::new(text);
  if let Some(position) = spec.plural {
    entry.plural = Some(arg(position)?.to_string());
  }
  if let Some(position) = spec.context {
    entry.context = Some(arg(position)?.to_string());
  }
  entry.references.push(format!("{}:{}", path, call.line));
  if let Some(comment) = &call.translator_comment {
    entry.extracted_comments.push(comment.clone());
  }
  Some(entry)
}

/// Write the POT unless nothing but the creation date changed and timestamps are frozen
///
/// Returns whether the file was written.
pub fn write_pot(path: &Path, content: &str, update_timestamp: bool) -> ReleaseResult<bool> {
  if path.exists() {
    let existing = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if existing == content {
      return Ok(false);
    }
    if !update_timestamp && without_creation_date(&existing) == without_creation_date(content) {
      tracing::info!("{} only differs in POT-Creation-Date, left untouched", path.display());
      return Ok(false);
    }
  }

  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(true)
}

fn without_creation_date(content: &str) -> Vec<&str> {
  content
    .lines()
    .filter(|line| !line.starts_with("\"POT-Creation-Date:"))
    .collect()
}
