//! GNU MO writer
//!
//! Layout (all integers little-endian u32):
//! magic, revision 0, count N, originals table offset, translations table offset,
//! hash table size 0, hash table offset, then both tables of (length, offset) pairs
//! and the NUL-terminated strings.

use crate::i18n::po::PoMessage;

pub const MO_MAGIC: u32 = 0x950412de;
const HEADER_LEN: usize = 28;

/// Encode compilable messages into MO bytes
///
/// Fuzzy and untranslated messages are skipped; the header entry is always kept.
pub fn encode(messages: &[PoMessage]) -> Vec<u8> {
  let mut pairs: Vec<(Vec<u8>, Vec<u8>)> = messages
    .iter()
    .filter(|m| m.is_header() || (!m.fuzzy && m.is_translated()))
    .map(|m| (original_key(m), m.translations.join("\0").into_bytes()))
    .collect();
  pairs.sort_by(|a, b| a.0.cmp(&b.0));
  pairs.dedup_by(|a, b| a.0 == b.0);

  let count = pairs.len();
  let originals_offset = HEADER_LEN;
  let translations_offset = originals_offset + count * 8;
  let mut string_offset = translations_offset + count * 8;

  let mut out = Vec::new();
  for value in [
    MO_MAGIC,
    0,
    count as u32,
    originals_offset as u32,
    translations_offset as u32,
    0,
    string_offset as u32,
  ] {
    out.extend_from_slice(&value.to_le_bytes());
  }

  let mut strings = Vec::new();
  let mut table = |bytes: &[u8], offset: &mut usize, out: &mut Vec<u8>| {
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&(*offset as u32).to_le_bytes());
    strings.extend_from_slice(bytes);
    strings.push(0);
    *offset += bytes.len() + 1;
  };

  for (original, _) in &pairs {
    table(original, &mut string_offset, &mut out);
  }
  for (_, translation) in &pairs {
    table(translation, &mut string_offset, &mut out);
  }

  out.extend_from_slice(&strings);
  out
}

fn original_key(message: &PoMessage) -> Vec<u8> {
  let mut key = String::new();
  if let Some(context) = &message.context {
    key.push_str(context);
    key.push('\u{4}');
  }
  key.push_str(&message.id);
  if let Some(plural) = &message.id_plural {
    key.push('\0');
    key.push_str(plural);
  }
  key.into_bytes()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn message(id: &str, translation: &str) -> PoMessage {
    PoMessage {
      id: id.to_string(),
      translations: vec![translation.to_string()],
      ..Default::default()
    }
  }

  fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
  }

  /// Read back the (original, translation) pairs
  fn decode(bytes: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
    let count = u32_at(bytes, 8) as usize;
    let originals = u32_at(bytes, 12) as usize;
    let translations = u32_at(bytes, 16) as usize;
    let read = |table: usize, i: usize| {
      let len = u32_at(bytes, table + i * 8) as usize;
      let offset = u32_at(bytes, table + i * 8 + 4) as usize;
      assert_eq!(bytes[offset + len], 0);
      bytes[offset..offset + len].to_vec()
    };
    (0..count).map(|i| (read(originals, i), read(translations, i))).collect()
  }

  #[test]
  fn test_header_layout() {
    let bytes = encode(&[message("", "Language: de\n"), message("Hello", "Hallo")]);
    assert_eq!(u32_at(&bytes, 0), MO_MAGIC);
    assert_eq!(u32_at(&bytes, 4), 0);
    assert_eq!(u32_at(&bytes, 8), 2);
    assert_eq!(u32_at(&bytes, 12), 28);
    assert_eq!(u32_at(&bytes, 16), 44);
    assert_eq!(u32_at(&bytes, 20), 0);
  }

  #[test]
  fn test_sorted_and_filtered() {
    let mut fuzzy = message("Fuzzy", "Unscharf");
    fuzzy.fuzzy = true;
    let messages = vec![
      message("b", "B"),
      message("", "Language: de\n"),
      fuzzy,
      message("a", "A"),
      message("untranslated", ""),
    ];
    let pairs = decode(&encode(&messages));
    let keys: Vec<Vec<u8>> = pairs.into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![b"".to_vec(), b"a".to_vec(), b"b".to_vec()]);
  }

  #[test]
  fn test_context_and_plural_encoding() {
    let plural = PoMessage {
      context: Some("count".to_string()),
      id: "%d site".to_string(),
      id_plural: Some("%d sites".to_string()),
      translations: vec!["%d Seite".to_string(), "%d Seiten".to_string()],
      fuzzy: false,
    };
    let pairs = decode(&encode(&[plural]));
    assert_eq!(pairs[0].0, b"count\x04%d site\0%d sites".to_vec());
    assert_eq!(pairs[0].1, b"%d Seite\0%d Seiten".to_vec());
  }
}
