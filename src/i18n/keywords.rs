//! Localization keyword specs in xgettext notation
//!
//! `_nx:1,2,4c,5d` reads: argument 1 is the singular text, argument 2 the plural,
//! argument 4 the context, argument 5 the text domain. Positions are 1-based.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSpec {
  /// Function name, e.g. `esc_html__`
  pub name: String,
  pub text: usize,
  pub plural: Option<usize>,
  pub context: Option<usize>,
  pub domain: Option<usize>,
}

impl KeywordSpec {
  pub fn parse(spec: &str) -> Result<Self, String> {
    let spec = spec.trim();
    let (name, positions) = match spec.split_once(':') {
      Some((name, positions)) => (name.trim(), Some(positions)),
      None => (spec, None),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
      return Err(format!("invalid function name in keyword '{}'", spec));
    }

    let mut parsed = KeywordSpec {
      name: name.to_string(),
      text: 1,
      plural: None,
      context: None,
      domain: None,
    };

    let Some(positions) = positions else {
      return Ok(parsed);
    };

    let mut texts = Vec::new();
    for part in positions.split(',') {
      let part = part.trim();
      let (digits, kind) = match part.chars().last() {
        Some('c') => (&part[..part.len() - 1], Some('c')),
        Some('d') => (&part[..part.len() - 1], Some('d')),
        _ => (part, None),
      };
      let position: usize = digits
        .parse()
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| format!("invalid argument position '{}' in keyword '{}'", part, spec))?;

      let slot = match kind {
        Some('c') => &mut parsed.context,
        Some('d') => &mut parsed.domain,
        _ => {
          texts.push(position);
          continue;
        }
      };
      if slot.replace(position).is_some() {
        return Err(format!("duplicate '{}' position in keyword '{}'", part, spec));
      }
    }

    match texts.as_slice() {
      [text] => parsed.text = *text,
      [text, plural] => {
        parsed.text = *text;
        parsed.plural = Some(*plural);
      }
      [] => return Err(format!("keyword '{}' names no text argument", spec)),
      _ => return Err(format!("keyword '{}' names more than two text arguments", spec)),
    }

    Ok(parsed)
  }
}

impl fmt::Display for KeywordSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.name, self.text)?;
    if let Some(plural) = self.plural {
      write!(f, ",{}", plural)?;
    }
    if let Some(context) = self.context {
      write!(f, ",{}c", context)?;
    }
    if let Some(domain) = self.domain {
      write!(f, ",{}d", domain)?;
    }
    Ok(())
  }
}
