//! Minimal PO reader, enough to compile translated catalogs

use crate::core::error::{ReleaseError, ReleaseResult};

/// One message of a PO file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoMessage {
  pub context: Option<String>,
  pub id: String,
  pub id_plural: Option<String>,
  /// `msgstr`, or `msgstr[0..n]` for plural messages
  pub translations: Vec<String>,
  pub fuzzy: bool,
}

impl PoMessage {
  pub fn is_header(&self) -> bool {
    self.id.is_empty() && self.context.is_none()
  }

  pub fn is_translated(&self) -> bool {
    !self.translations.is_empty() && self.translations.iter().all(|t| !t.is_empty())
  }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
  Context,
  Id,
  IdPlural,
  Str(usize),
}

#[derive(Default)]
struct Pending {
  message: PoMessage,
  fuzzy: bool,
  started: bool,
}

/// Parse PO text; `origin` names the file in error messages
pub fn parse(content: &str, origin: &str) -> ReleaseResult<Vec<PoMessage>> {
  let mut messages = Vec::new();
  let mut pending = Pending::default();
  let mut field: Option<Field> = None;

  let content = content.strip_prefix('\u{feff}').unwrap_or(content);
  for (index, raw) in content.lines().enumerate() {
    let line_no = index + 1;
    let line = raw.trim();
    let err = |what: &str| ReleaseError::message(format!("{}:{}: {}", origin, line_no, what));

    if line.is_empty() {
      continue;
    }

    if let Some(flags) = line.strip_prefix("#,") {
      // flags precede the message they belong to
      if pending.started {
        flush(&mut pending, &mut messages);
        field = None;
      }
      if flags.split(',').any(|f| f.trim() == "fuzzy") {
        pending.fuzzy = true;
      }
      continue;
    }
    if line.starts_with('#') {
      continue;
    }

    if line.starts_with('"') {
      let value = unquote(line).ok_or_else(|| err("malformed string"))?;
      let target = field.ok_or_else(|| err("string continuation without a keyword"))?;
      append(&mut pending.message, target, &value);
      continue;
    }

    let (keyword, rest) = line.split_once(char::is_whitespace).ok_or_else(|| err("expected keyword and string"))?;
    let value = unquote(rest.trim()).ok_or_else(|| err("malformed string"))?;

    let next = match keyword {
      "msgctxt" => Field::Context,
      "msgid" => Field::Id,
      "msgid_plural" => Field::IdPlural,
      "msgstr" => Field::Str(0),
      other => match other.strip_prefix("msgstr[").and_then(|s| s.strip_suffix(']')) {
        Some(n) => Field::Str(n.parse().map_err(|_| err("invalid plural index"))?),
        None => return Err(err(&format!("unknown keyword '{}'", other))),
      },
    };

    // a new msgctxt, or a msgid not preceded by msgctxt, starts the next message
    let starts_message = match next {
      Field::Context => true,
      Field::Id => field != Some(Field::Context),
      _ => false,
    };
    if starts_message && pending.started {
      flush(&mut pending, &mut messages);
    }

    pending.started = true;
    match next {
      Field::Context => pending.message.context = Some(String::new()),
      Field::IdPlural => pending.message.id_plural = Some(String::new()),
      Field::Str(n) => {
        if pending.message.translations.len() <= n {
          pending.message.translations.resize(n + 1, String::new());
        }
      }
      Field::Id => {}
    }
    append(&mut pending.message, next, &value);
    field = Some(next);
  }

  if pending.started {
    flush(&mut pending, &mut messages);
  }
  Ok(messages)
}

fn flush(pending: &mut Pending, messages: &mut Vec<PoMessage>) {
  let mut done = std::mem::take(pending);
  done.message.fuzzy = done.fuzzy;
  messages.push(done.message);
}

fn append(message: &mut PoMessage, field: Field, value: &str) {
  match field {
    Field::Context => message.context.get_or_insert_with(String::new).push_str(value),
    Field::Id => message.id.push_str(value),
    Field::IdPlural => message.id_plural.get_or_insert_with(String::new).push_str(value),
    Field::Str(n) => {
      if let Some(slot) = message.translations.get_mut(n) {
        slot.push_str(value);
      }
    }
  }
}

/// Strip quotes and decode C escapes
fn unquote(quoted: &str) -> Option<String> {
  let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
  let mut out = String::with_capacity(inner.len());
  let mut chars = inner.chars();
  while let Some(ch) = chars.next() {
    if ch != '\\' {
      out.push(ch);
      continue;
    }
    match chars.next()? {
      'n' => out.push('\n'),
      't' => out.push('\t'),
      'r' => out.push('\r'),
      'a' => out.push('\u{7}'),
      'b' => out.push('\u{8}'),
      'f' => out.push('\u{c}'),
      'v' => out.push('\u{b}'),
      other => out.push(other),
    }
  }
  Some(out)
}
