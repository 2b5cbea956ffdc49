//! Text-domain audit
//!
//! Every localization call must pass the plugin's text domain as a string literal.
//! This is pattern matching on call syntax, so it is lossy: calls built through
//! variables or wrappers are not seen.

use super::trait_def::{Check, CheckResult};
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::core::fileset::FileSet;
use crate::i18n::keywords::KeywordSpec;
use crate::i18n::scanner::{self, Arg};
use crate::ui::progress::{self, FileProgress};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What is wrong with a call's domain argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
  /// Fewer arguments than the domain position
  MissingDomain,
  /// Domain literal differs from the configured domain
  MismatchedDomain { found: String },
  /// Domain is passed as a variable or expression
  VariableDomain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
  pub file: PathBuf,
  pub line: usize,
  pub function: String,
  #[serde(flatten)]
  pub kind: FindingKind,
}

impl fmt::Display for Finding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{} {}() ", self.file.display(), self.line, self.function)?;
    match &self.kind {
      FindingKind::MissingDomain => write!(f, "is missing the text domain"),
      FindingKind::MismatchedDomain { found } => write!(f, "uses text domain '{}'", found),
      FindingKind::VariableDomain => write!(f, "passes the text domain as a variable"),
    }
  }
}

/// Audit options
#[derive(Debug, Clone)]
pub struct AuditOptions<'a> {
  pub domain: &'a str,
  pub keywords: &'a [KeywordSpec],
  pub report_missing: bool,
}

/// Scan `files` under `root` and report calls with a wrong or absent text domain
pub fn audit(root: &Path, files: &FileSet, options: &AuditOptions<'_>) -> ReleaseResult<Vec<Finding>> {
  let specs: HashMap<&str, &KeywordSpec> = options
    .keywords
    .iter()
    .filter(|k| k.domain.is_some())
    .map(|k| (k.name.as_str(), k))
    .collect();
  let names: HashSet<&str> = specs.keys().copied().collect();

  let paths = files.collect(root)?;
  let mut bar = FileProgress::maybe(paths.len(), format!("Auditing {} files", paths.len()));
  let mut findings = Vec::new();

  for rel in paths {
    let path = root.join(&rel);
    let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let source = String::from_utf8_lossy(&bytes);

    for call in scanner::find_calls(&scanner::tokenize(&source), &names) {
      let Some(spec) = specs.get(call.name.as_str()) else {
        continue;
      };
      let Some(position) = spec.domain else {
        continue;
      };

      let kind = match call.args.get(position - 1) {
        None if options.report_missing => Some(FindingKind::MissingDomain),
        None => None,
        Some(Arg::Literal(found)) if found == options.domain => None,
        Some(Arg::Literal(found)) => Some(FindingKind::MismatchedDomain { found: found.clone() }),
        Some(Arg::Expr) => Some(FindingKind::VariableDomain),
      };

      if let Some(kind) = kind {
        findings.push(Finding {
          file: rel.clone(),
          line: call.line,
          function: call.name.clone(),
          kind,
        });
      }
    }
    progress::tick(&mut bar);
  }

  Ok(findings)
}

/// Audit the plugin with its configured keywords, files and domain
pub fn audit_plugin(ctx: &ReleaseContext) -> ReleaseResult<Vec<Finding>> {
  let keywords = ctx.config.keyword_specs()?;
  let files = FileSet::new(&ctx.config.audit.files)?;
  audit(
    ctx.root(),
    &files,
    &AuditOptions {
      domain: ctx.text_domain(),
      keywords: &keywords,
      report_missing: ctx.config.audit.report_missing,
    },
  )
}

/// Log findings as warnings; in strict mode any finding fails
pub fn enforce(findings: &[Finding], strict: bool) -> ReleaseResult<()> {
  for finding in findings {
    tracing::warn!("{}", finding);
  }
  if strict && !findings.is_empty() {
    return Err(ReleaseError::Validation {
      reason: format!("{} text domain finding(s) in strict mode", findings.len()),
    });
  }
  Ok(())
}

/// Text-domain audit as a check
pub struct TextDomainCheck;

impl Check for TextDomainCheck {
  fn name(&self) -> &'static str {
    "text-domain"
  }

  fn description(&self) -> &'static str {
    "Localization calls pass the plugin text domain"
  }

  fn run(&self, ctx: &ReleaseContext) -> ReleaseResult<CheckResult> {
    let findings = audit_plugin(ctx)?;
    if findings.is_empty() {
      return Ok(CheckResult::pass(
        self.name(),
        format!("All localization calls use '{}'", ctx.text_domain()),
      ));
    }

    let message = format!("{} call(s) with a wrong or missing text domain", findings.len());
    let suggestion = Some(format!("Pass '{}' as the text domain argument", ctx.text_domain()));
    let result = if ctx.config.audit.strict {
      CheckResult::error(self.name(), message, suggestion)
    } else {
      CheckResult::warning(self.name(), message, suggestion)
    };
    Ok(result.with_details(serde_json::to_value(&findings)?))
  }
}
