//! In-memory translation catalog and its POT rendering

use serde::Serialize;
use std::collections::HashMap;

/// One translatable string; identity is (context, text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationEntry {
  pub context: Option<String>,
  pub text: String,
  pub plural: Option<String>,
  /// `path:line` source references, first-seen order
  pub references: Vec<String>,
  /// `#.` comments (translator notes, plugin header metadata)
  pub extracted_comments: Vec<String>,
}

impl TranslationEntry {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      context: None,
      text: text.into(),
      plural: None,
      references: Vec::new(),
      extracted_comments: Vec::new(),
    }
  }

  pub fn key(&self) -> (Option<String>, String) {
    (self.context.clone(), self.text.clone())
  }
}

/// Entries the catalog must never contain
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
  pub excluded_strings: Vec<String>,
  pub excluded_meta: Vec<String>,
}

/// Why an entry is excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
  String(String),
  Meta(String),
}

/// Exclusion predicate: text on the string denylist, or any extracted comment on the
/// meta denylist
pub fn should_exclude(entry: &TranslationEntry, rules: &ExclusionRules) -> bool {
  excluded_string(entry, rules) || excluded_meta(entry, rules).is_some()
}

fn excluded_string(entry: &TranslationEntry, rules: &ExclusionRules) -> bool {
  rules.excluded_strings.iter().any(|s| *s == entry.text)
}

fn excluded_meta<'a>(entry: &'a TranslationEntry, rules: &ExclusionRules) -> Option<&'a String> {
  entry
    .extracted_comments
    .iter()
    .find(|c| rules.excluded_meta.iter().any(|m| m == *c))
}

/// Ordered set of entries plus catalog headers
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  headers: Vec<(String, String)>,
  entries: Vec<TranslationEntry>,
  index: HashMap<(Option<String>, String), usize>,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add an entry, merging references and comments into an existing one
  pub fn add(&mut self, entry: TranslationEntry) {
    let key = entry.key();
    match self.index.get(&key) {
      Some(&i) => {
        let existing = &mut self.entries[i];
        if existing.plural.is_none() {
          existing.plural = entry.plural;
        }
        for reference in entry.references {
          if !existing.references.contains(&reference) {
            existing.references.push(reference);
          }
        }
        for comment in entry.extracted_comments {
          if !existing.extracted_comments.contains(&comment) {
            existing.extracted_comments.push(comment);
          }
        }
      }
      None => {
        self.index.insert(key, self.entries.len());
        self.entries.push(entry);
      }
    }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Drop every excluded entry, returning what was dropped and why
  pub fn apply_exclusions(&mut self, rules: &ExclusionRules) -> Vec<ExclusionReason> {
    let mut removed = Vec::new();
    self.entries.retain(|entry| {
      if !should_exclude(entry, rules) {
        return true;
      }
      // a string denylist hit wins over a meta hit
      removed.push(match excluded_meta(entry, rules) {
        Some(meta) if !excluded_string(entry, rules) => ExclusionReason::Meta(meta.clone()),
        _ => ExclusionReason::String(entry.text.clone()),
      });
      false
    });
    self.index = self.entries.iter().enumerate().map(|(i, e)| (e.key(), i)).collect();
    removed
  }

  /// Set a header, replacing an existing one regardless of key case
  pub fn set_header(&mut self, name: &str, value: &str) {
    match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
      Some(slot) => slot.1 = value.to_string(),
      None => self.headers.push((name.to_string(), value.to_string())),
    }
  }

  /// Render as a POT file
  pub fn to_pot(&self, package: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
      "# This file is distributed under the same license as the {} package.\n",
      package
    ));
    out.push_str("msgid \"\"\nmsgstr \"\"\n");
    for (name, value) in &self.headers {
      out.push_str(&format!("\"{}: {}\\n\"\n", escape(name), escape(value)));
    }

    for entry in &self.entries {
      out.push('\n');
      for comment in &entry.extracted_comments {
        out.push_str(&format!("#. {}\n", comment));
      }
      if !entry.references.is_empty() {
        out.push_str(&format!("#: {}\n", entry.references.join(" ")));
      }
      if let Some(context) = &entry.context {
        write_field(&mut out, "msgctxt", context);
      }
      write_field(&mut out, "msgid", &entry.text);
      match &entry.plural {
        Some(plural) => {
          write_field(&mut out, "msgid_plural", plural);
          out.push_str("msgstr[0] \"\"\nmsgstr[1] \"\"\n");
        }
        None => out.push_str("msgstr \"\"\n"),
      }
    }

    out
  }
}

fn write_field(out: &mut String, keyword: &str, value: &str) {
  let body = value.trim_end_matches('\n');
  if body.contains('\n') {
    out.push_str(&format!("{} \"\"\n", keyword));
    for line in value.split_inclusive('\n') {
      out.push_str(&format!("\"{}\"\n", escape(line)));
    }
  } else {
    out.push_str(&format!("{} \"{}\"\n", keyword, escape(value)));
  }
}

/// PO string escaping
pub fn escape(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for ch in value.chars() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '"' => out.push_str("\\\""),
      '\n' => out.push_str("\\n"),
      '\t' => out.push_str("\\t"),
      '\r' => out.push_str("\\r"),
      _ => out.push(ch),
    }
  }
  out
}

#[cfg(test)]
impl Catalog {
  pub fn get(&self, context: Option<&str>, text: &str) -> Option<&TranslationEntry> {
    self
      .index
      .get(&(context.map(String::from), text.to_string()))
      .map(|&i| &self.entries[i])
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(text: &str, comments: &[&str]) -> TranslationEntry {
    let mut e = TranslationEntry::new(text);
    e.extracted_comments = comments.iter().map(|c| c.to_string()).collect();
    e
  }

  fn rules() -> ExclusionRules {
    ExclusionRules {
      excluded_strings: vec!["Yes".into(), "No".into()],
      excluded_meta: vec!["Author of the plugin/theme".into()],
    }
  }

  #[test]
  fn test_exclusion_by_text() {
    assert!(should_exclude(&entry("Yes", &[]), &rules()));
    assert!(!should_exclude(&entry("Yes please", &[]), &rules()));
  }

  #[test]
  fn test_exclusion_by_meta_regardless_of_text() {
    assert!(should_exclude(&entry("WPStore.io", &["Author of the plugin/theme"]), &rules()));
    assert!(!should_exclude(&entry("WPStore.io", &["translators: author"]), &rules()));
  }

  #[test]
  fn test_merge_keeps_first_seen_order() {
    let mut catalog = Catalog::new();
    let mut a = TranslationEntry::new("Hello");
    a.references.push("a.php:1".into());
    let mut b = TranslationEntry::new("Hello");
    b.references.push("b.php:2".into());
    b.references.push("a.php:1".into());
    catalog.add(a);
    catalog.add(TranslationEntry::new("World"));
    catalog.add(b);

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(None, "Hello").unwrap().references, vec!["a.php:1", "b.php:2"]);
    let pot = catalog.to_pot("demo");
    assert!(pot.find("msgid \"Hello\"").unwrap() < pot.find("msgid \"World\"").unwrap());
  }

  #[test]
  fn test_context_separates_entries() {
    let mut catalog = Catalog::new();
    let mut post = TranslationEntry::new("Post");
    post.context = Some("verb".into());
    catalog.add(post);
    catalog.add(TranslationEntry::new("Post"));
    assert_eq!(catalog.len(), 2);
    assert!(catalog.get(Some("verb"), "Post").is_some());
  }

  #[test]
  fn test_apply_exclusions_reindexes() {
    let mut catalog = Catalog::new();
    catalog.add(entry("Yes", &[]));
    catalog.add(entry("Keep", &[]));
    let removed = catalog.apply_exclusions(&rules());
    assert_eq!(removed, vec![ExclusionReason::String("Yes".into())]);
    assert!(catalog.get(None, "Yes").is_none());
    assert!(catalog.get(None, "Keep").is_some());
  }

  #[test]
  fn test_header_override_is_case_insensitive() {
    let mut catalog = Catalog::new();
    catalog.set_header("Report-Msgid-Bugs-To", "https://wordpress.org/support/plugin/demo");
    catalog.set_header("report-msgid-bugs-to", "https://example.com/issues");
    assert_eq!(catalog.to_pot("demo").matches("-Bugs-To:").count(), 1);
    assert_eq!(catalog.header("Report-Msgid-Bugs-To"), Some("https://example.com/issues"));
  }

  #[test]
  fn test_render_plural_context_and_multiline() {
    let mut catalog = Catalog::new();
    let mut e = TranslationEntry::new("%d file");
    e.plural = Some("%d files".into());
    e.context = Some("count".into());
    e.references.push("a.php:3".into());
    catalog.add(e);
    catalog.add(TranslationEntry::new("Line one\nLine \"two\""));

    let pot = catalog.to_pot("demo");
    assert!(pot.contains("#: a.php:3\nmsgctxt \"count\"\nmsgid \"%d file\"\nmsgid_plural \"%d files\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n"));
    assert!(pot.contains("msgid \"\"\n\"Line one\\n\"\n\"Line \\\"two\\\"\"\nmsgstr \"\"\n"));
  }
}
