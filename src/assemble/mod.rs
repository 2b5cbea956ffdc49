//! Release artifact assembly: staging, line endings and the zip archive
//!
//! Each step works on the output of the previous one: the staged tree is a filtered
//! copy of the working tree, normalization rewrites staged files in place, and the
//! archive is built from the normalized staging directory.

mod archive;
mod eol;
mod stage;

pub use archive::{archive, archive_file_name};
pub use eol::normalize_line_endings;
pub use stage::{clean, stage};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical line ending for staged text files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
  #[default]
  Lf,
  Crlf,
  Cr,
}

impl LineEnding {
  pub fn as_bytes(self) -> &'static [u8] {
    match self {
      LineEnding::Lf => b"\n",
      LineEnding::Crlf => b"\r\n",
      LineEnding::Cr => b"\r",
    }
  }
}

impl fmt::Display for LineEnding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LineEnding::Lf => write!(f, "lf"),
      LineEnding::Crlf => write!(f, "crlf"),
      LineEnding::Cr => write!(f, "cr"),
    }
  }
}

/// Zip compression method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
  #[default]
  Deflated,
  Stored,
}

impl Compression {
  fn method(self) -> zip::CompressionMethod {
    match self {
      Compression::Deflated => zip::CompressionMethod::Deflated,
      Compression::Stored => zip::CompressionMethod::Stored,
    }
  }
}
