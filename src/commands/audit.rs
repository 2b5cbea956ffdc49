use crate::checks::textdomain::{FindingKind, audit_plugin, enforce};
use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;

/// Run only the text-domain audit
///
/// Findings are reported, not fatal, unless `strict` (or `audit.strict`) is set.
pub fn run_audit(ctx: &ReleaseContext, json: bool, strict: bool) -> ReleaseResult<()> {
  let findings = audit_plugin(ctx)?;
  let strict = strict || ctx.config.audit.strict;

  if json {
    println!("{}", serde_json::to_string_pretty(&findings)?);
  } else if findings.is_empty() {
    println!("✅ All localization calls use text domain '{}'", ctx.text_domain());
  } else {
    println!("🔍 Text domain '{}': {} finding(s)\n", ctx.text_domain(), findings.len());
    for finding in &findings {
      let icon = match finding.kind {
        FindingKind::MissingDomain => "⚠️ ",
        FindingKind::MismatchedDomain { .. } | FindingKind::VariableDomain => "❌",
      };
      println!("{} {}", icon, finding);
    }
    if !strict {
      println!("\n💡 Use --strict to fail on findings");
    }
  }

  if strict {
    enforce(&findings, true)?;
  }
  Ok(())
}
