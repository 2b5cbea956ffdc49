//! Call-site scanner for PHP sources
//!
//! This is not a PHP parser. It tokenizes just enough (PHP regions, strings, comments,
//! heredocs, identifiers, brackets) to find `name(...)` calls and tell literal string
//! arguments apart from everything else. Anything more exotic is treated as a
//! non-literal argument.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
  Ident(String),
  /// String literal with escapes decoded
  Str(String),
  Comment(String),
  Variable(String),
  /// `->`, `?->` or `::`
  Member,
  Punct(char),
  /// Numbers, interpolated strings, heredocs
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
  pub token: Token,
  pub line: usize,
  pub end_line: usize,
}

/// One call argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
  /// A string literal, or literals joined with `.`
  Literal(String),
  Expr,
}

impl Arg {
  pub fn literal(&self) -> Option<&str> {
    match self {
      Arg::Literal(s) => Some(s),
      Arg::Expr => None,
    }
  }
}

/// A call to one of the requested function names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
  pub name: String,
  pub line: usize,
  pub args: Vec<Arg>,
  /// `translators:` comment attached to the call
  pub translator_comment: Option<String>,
}

struct Lexer<'a> {
  src: &'a [u8],
  text: &'a str,
  pos: usize,
  line: usize,
  tokens: Vec<Spanned>,
}

/// Tokenize the PHP regions of a file
pub fn tokenize(source: &str) -> Vec<Spanned> {
  let mut lexer = Lexer {
    src: source.as_bytes(),
    text: source,
    pos: 0,
    line: 1,
    tokens: Vec::new(),
  };
  lexer.run();
  lexer.tokens
}

impl<'a> Lexer<'a> {
  fn run(&mut self) {
    while self.pos < self.src.len() {
      self.skip_html();
      self.lex_php();
    }
  }

  fn starts_with(&self, s: &str) -> bool {
    self.src[self.pos..].starts_with(s.as_bytes())
  }

  fn peek(&self, offset: usize) -> Option<u8> {
    self.src.get(self.pos + offset).copied()
  }

  fn advance(&mut self, n: usize) {
    for _ in 0..n {
      if self.pos >= self.src.len() {
        return;
      }
      if self.src[self.pos] == b'\n' {
        self.line += 1;
      }
      self.pos += 1;
    }
  }

  fn push(&mut self, token: Token, line: usize) {
    self.tokens.push(Spanned {
      token,
      line,
      end_line: self.line,
    });
  }

  /// Skip inline HTML up to and including the next open tag
  fn skip_html(&mut self) {
    while self.pos < self.src.len() {
      if self.starts_with("<?php") {
        self.advance(5);
        return;
      }
      if self.starts_with("<?=") {
        self.advance(3);
        return;
      }
      self.advance(1);
    }
  }

  fn lex_php(&mut self) {
    while self.pos < self.src.len() {
      let c = self.src[self.pos];
      let line = self.line;

      if c.is_ascii_whitespace() {
        self.advance(1);
      } else if self.starts_with("?>") {
        self.advance(2);
        return;
      } else if self.starts_with("//") || (c == b'#' && self.peek(1) != Some(b'[')) {
        self.lex_line_comment();
      } else if self.starts_with("/*") {
        self.lex_block_comment();
      } else if c == b'\'' {
        let value = self.lex_single_quoted();
        self.push(Token::Str(value), line);
      } else if c == b'"' {
        let token = self.lex_double_quoted();
        self.push(token, line);
      } else if self.starts_with("<<<") {
        self.lex_heredoc();
        self.push(Token::Other, line);
      } else if self.starts_with("->") || self.starts_with("::") {
        self.advance(2);
        self.push(Token::Member, line);
      } else if self.starts_with("?->") {
        self.advance(3);
        self.push(Token::Member, line);
      } else if c == b'$' && self.peek(1).is_some_and(is_ident_start) {
        self.advance(1);
        let name = self.lex_ident();
        self.push(Token::Variable(name), line);
      } else if is_ident_start(c) || (c == b'\\' && self.peek(1).is_some_and(is_ident_start)) {
        let name = self.lex_ident();
        let name = name.strip_prefix('\\').unwrap_or(&name).to_string();
        self.push(Token::Ident(name), line);
      } else if c.is_ascii_digit() {
        while self.peek(0).is_some_and(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_') {
          self.advance(1);
        }
        self.push(Token::Other, line);
      } else {
        let ch = self.text[self.pos..].chars().next().unwrap_or('\u{fffd}');
        self.advance(ch.len_utf8());
        self.push(Token::Punct(ch), line);
      }
    }
  }

  fn lex_ident(&mut self) -> String {
    let start = self.pos;
    while self.peek(0).is_some_and(|b| is_ident_char(b) || b == b'\\') {
      self.advance(1);
    }
    self.text[start..self.pos].to_string()
  }

  fn lex_line_comment(&mut self) {
    let line = self.line;
    let start = self.pos;
    while self.pos < self.src.len() && self.src[self.pos] != b'\n' && !self.starts_with("?>") {
      self.advance(1);
    }
    let body = self.text[start..self.pos].to_string();
    self.tokens.push(Spanned {
      token: Token::Comment(body),
      line,
      end_line: line,
    });
  }

  fn lex_block_comment(&mut self) {
    let line = self.line;
    let start = self.pos;
    self.advance(2);
    while self.pos < self.src.len() && !self.starts_with("*/") {
      self.advance(1);
    }
    self.advance(2);
    let end = self.pos.min(self.src.len());
    let body = self.text[start..end].to_string();
    self.push(Token::Comment(body), line);
  }

  fn lex_single_quoted(&mut self) -> String {
    self.advance(1);
    let mut value = String::new();
    let mut chunk_start = self.pos;
    while self.pos < self.src.len() {
      match self.src[self.pos] {
        b'\'' => break,
        b'\\' if matches!(self.peek(1), Some(b'\'') | Some(b'\\')) => {
          value.push_str(&self.text[chunk_start..self.pos]);
          value.push(self.src[self.pos + 1] as char);
          self.advance(2);
          chunk_start = self.pos;
        }
        _ => self.advance(1),
      }
    }
    value.push_str(&self.text[chunk_start..self.pos.min(self.src.len())]);
    self.advance(1);
    value
  }

  fn lex_double_quoted(&mut self) -> Token {
    self.advance(1);
    let mut value = String::new();
    let mut interpolated = false;
    let mut chunk_start = self.pos;
    while self.pos < self.src.len() {
      match self.src[self.pos] {
        b'"' => break,
        b'\\' => {
          value.push_str(&self.text[chunk_start..self.pos]);
          let decoded = match self.peek(1) {
            Some(b'n') => Some('\n'),
            Some(b't') => Some('\t'),
            Some(b'r') => Some('\r'),
            Some(b'v') => Some('\u{0b}'),
            Some(b'e') => Some('\u{1b}'),
            Some(b'f') => Some('\u{0c}'),
            Some(b'\\') => Some('\\'),
            Some(b'$') => Some('$'),
            Some(b'"') => Some('"'),
            _ => None,
          };
          match decoded {
            Some(ch) => {
              value.push(ch);
              self.advance(2);
            }
            None => {
              value.push('\\');
              self.advance(1);
            }
          }
          chunk_start = self.pos;
        }
        b'$' if self.peek(1).is_some_and(|b| is_ident_start(b) || b == b'{') => {
          interpolated = true;
          self.advance(1);
        }
        b'{' if self.peek(1) == Some(b'$') => {
          interpolated = true;
          self.advance(1);
        }
        _ => self.advance(1),
      }
    }
    value.push_str(&self.text[chunk_start..self.pos.min(self.src.len())]);
    self.advance(1);

    if interpolated { Token::Other } else { Token::Str(value) }
  }

  /// Skip a heredoc/nowdoc body up to its closing identifier
  fn lex_heredoc(&mut self) {
    self.advance(3);
    while self.peek(0).is_some_and(|b| b == b' ' || b == b'\t') {
      self.advance(1);
    }
    let quoted = matches!(self.peek(0), Some(b'\'') | Some(b'"'));
    if quoted {
      self.advance(1);
    }
    let label = self.lex_ident();
    if quoted {
      self.advance(1);
    }
    if label.is_empty() {
      return;
    }

    // Body starts on the next line; the closing label starts a line (possibly indented)
    while self.pos < self.src.len() {
      if self.src[self.pos] == b'\n' {
        self.advance(1);
        while self.peek(0).is_some_and(|b| b == b' ' || b == b'\t') {
          self.advance(1);
        }
        if self.starts_with(&label) && !self.peek(label.len()).is_some_and(is_ident_char) {
          self.advance(label.len());
          return;
        }
      } else {
        self.advance(1);
      }
    }
  }
}

fn is_ident_start(b: u8) -> bool {
  b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
  b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Find calls to any of `names`
pub fn find_calls(tokens: &[Spanned], names: &HashSet<&str>) -> Vec<Call> {
  let code: Vec<&Spanned> = tokens.iter().collect();
  let mut calls = Vec::new();

  for (i, spanned) in code.iter().enumerate() {
    let Token::Ident(name) = &spanned.token else {
      continue;
    };
    if !names.contains(name.as_str()) {
      continue;
    }

    let Some(open) = next_code(&code, i + 1) else {
      continue;
    };
    if code[open].token != Token::Punct('(') {
      continue;
    }

    if let Some(prev) = prev_code(&code, i) {
      match &code[prev].token {
        Token::Member => continue,
        Token::Ident(kw) if kw.eq_ignore_ascii_case("function") || kw.eq_ignore_ascii_case("new") => continue,
        _ => {}
      }
    }

    calls.push(Call {
      name: name.clone(),
      line: spanned.line,
      args: parse_args(&code, open + 1),
      translator_comment: translator_comment(&code, i),
    });
  }

  calls
}

fn next_code(code: &[&Spanned], from: usize) -> Option<usize> {
  (from..code.len()).find(|&j| !matches!(code[j].token, Token::Comment(_)))
}

fn prev_code(code: &[&Spanned], before: usize) -> Option<usize> {
  (0..before).rev().find(|&j| !matches!(code[j].token, Token::Comment(_)))
}

fn parse_args(code: &[&Spanned], start: usize) -> Vec<Arg> {
  let mut args = Vec::new();
  let mut current: Vec<&Token> = Vec::new();
  let mut depth = 0usize;
  let mut closed = false;

  for spanned in &code[start..] {
    match &spanned.token {
      Token::Comment(_) => continue,
      Token::Punct('(') | Token::Punct('[') | Token::Punct('{') => depth += 1,
      Token::Punct(')') if depth == 0 => {
        closed = true;
        break;
      }
      Token::Punct(')') | Token::Punct(']') | Token::Punct('}') => depth = depth.saturating_sub(1),
      Token::Punct(',') if depth == 0 => {
        args.push(classify(&current));
        current.clear();
        continue;
      }
      _ => {}
    }
    current.push(&spanned.token);
  }

  // `f()` has no arguments; `f(a,)` has one
  if !current.is_empty() {
    args.push(classify(&current));
  }
  if !closed {
    tracing::trace!("unterminated call argument list");
  }
  args
}

fn classify(tokens: &[&Token]) -> Arg {
  let mut value = String::new();
  let mut expect_string = true;
  for token in tokens {
    match (expect_string, token) {
      (true, Token::Str(s)) => {
        value.push_str(s);
        expect_string = false;
      }
      (false, Token::Punct('.')) => expect_string = true,
      _ => return Arg::Expr,
    }
  }
  if tokens.is_empty() || expect_string {
    Arg::Expr
  } else {
    Arg::Literal(value)
  }
}

/// Nearest comment mentioning `translators:` ending on the call line or the line before
fn translator_comment(code: &[&Spanned], call: usize) -> Option<String> {
  let call_line = code[call].line;
  for j in (0..call).rev() {
    let spanned = code[j];
    if spanned.end_line + 1 < call_line {
      return None;
    }
    if let Token::Comment(body) = &spanned.token {
      let cleaned = clean_comment(body);
      if cleaned.to_ascii_lowercase().starts_with("translators:") {
        return Some(cleaned);
      }
    }
  }
  None
}

fn clean_comment(body: &str) -> String {
  let body = body
    .trim()
    .trim_start_matches("/**")
    .trim_start_matches("/*")
    .trim_start_matches("//")
    .trim_start_matches('#')
    .trim_end_matches("*/");
  body
    .lines()
    .map(|l| l.trim().trim_start_matches('*').trim())
    .filter(|l| !l.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}
