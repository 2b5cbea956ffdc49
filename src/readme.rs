//! readme.txt to README.md conversion
//!
//! WordPress.org readmes use `=== Title ===` style headings and a block of
//! `Key: value` fields under the title. GitHub wants markdown, and screenshots that
//! live in the plugin's assets need absolute URLs there.

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(={1,3})\s*(.*?)\s*(={1,3})\s*$").expect("static regex"));

static HEADER_FIELD: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z ]*?)\s*:\s*(.*?)\s*$").expect("static regex"));

static SCREENSHOT_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)\.\s+(.*?)\s*$").expect("static regex"));

const PROFILE_URL: &str = "https://profiles.wordpress.org/";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Region {
  /// Before the title
  Preamble,
  /// Between the title and the first blank line
  Fields,
  Body,
  Screenshots,
}

/// Convert readme.txt markup to markdown
///
/// Pure function of its inputs; converting the same source twice yields the same output.
pub fn convert(source: &str, slug: &str, screenshot_url: &str) -> String {
  let mut out = Vec::new();
  let mut region = Region::Preamble;

  for line in source.lines() {
    let line = line.trim_end_matches('\r');

    if let Some((level, title)) = heading(line) {
      region = match level {
        1 if region == Region::Preamble => Region::Fields,
        2 if title.eq_ignore_ascii_case("screenshots") => Region::Screenshots,
        2 => Region::Body,
        _ if region == Region::Fields || region == Region::Preamble => Region::Body,
        _ => region,
      };
      let hashes = "#".repeat(level);
      out.push(format!("{} {} {}", hashes, title, hashes));
      continue;
    }

    match region {
      Region::Fields if line.trim().is_empty() => {
        region = Region::Body;
        out.push(String::new());
      }
      Region::Fields => match HEADER_FIELD.captures(line) {
        Some(caps) => {
          let key = &caps[1];
          let value = if key.eq_ignore_ascii_case("contributors") {
            link_contributors(&caps[2])
          } else {
            caps[2].to_string()
          };
          out.push(format!("**{}:** {}  ", key, value));
        }
        None => out.push(line.to_string()),
      },
      Region::Screenshots => match SCREENSHOT_ITEM.captures(line) {
        Some(caps) => {
          let number = &caps[1];
          let caption = &caps[2];
          let url = screenshot_url
            .replace("{plugin}", slug)
            .replace("{screenshot}", &format!("screenshot-{}", number));
          out.push(format!("### {}. {} ###", number, caption));
          out.push(format!("![{}]({})", caption, url));
          out.push(String::new());
        }
        None => out.push(line.to_string()),
      },
      Region::Preamble | Region::Body => out.push(line.to_string()),
    }
  }

  let mut markdown = out.join("\n");
  markdown.push('\n');
  markdown
}

/// `=== X ===` is level 1, `== X ==` level 2, `= X =` level 3
fn heading(line: &str) -> Option<(usize, &str)> {
  let caps = HEADING.captures(line.trim())?;
  let open = caps.get(1)?.as_str().len();
  let close = caps.get(3)?.as_str().len();
  let title = caps.get(2)?.as_str();
  if open != close || title.is_empty() {
    return None;
  }
  Some((4 - open, title))
}

fn link_contributors(value: &str) -> String {
  value
    .split(',')
    .map(str::trim)
    .filter(|name| !name.is_empty())
    .map(|name| format!("[{}]({}{})", name, PROFILE_URL, name))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Convert the plugin's readme and write README.md; returns the output path
pub fn convert_readme(ctx: &ReleaseContext) -> ReleaseResult<PathBuf> {
  let source_path = ctx.readme_path();
  let source =
    fs::read_to_string(&source_path).with_context(|| format!("Failed to read {}", source_path.display()))?;

  let markdown = convert(&source, ctx.slug(), &ctx.config.readme.screenshot_url);
  let output = ctx.root.join(&ctx.config.readme.output);

  let unchanged = fs::read_to_string(&output).map(|existing| existing == markdown).unwrap_or(false);
  if unchanged {
    tracing::debug!("{} is up to date", output.display());
  } else {
    fs::write(&output, &markdown).with_context(|| format!("Failed to write {}", output.display()))?;
  }
  Ok(output)
}
