//! Progress indicators for long-running file operations
//!
//! Uses `linya` progress bars. Bars are only drawn when stderr is a terminal, so
//! piped output and test runs stay clean.

use linya::{Bar, Progress};
use std::io::IsTerminal;

/// Progress bar wrapper for file operations
pub struct FileProgress {
  progress: Progress,
  bar: Bar,
}

impl FileProgress {
  /// Create a new progress bar for file transformations
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// A bar for `total` items, or `None` when there is nothing worth drawing
  pub fn maybe(total: usize, label: impl Into<String>) -> Option<Self> {
    if total < 2 || !std::io::stderr().is_terminal() {
      return None;
    }
    Some(Self::new(total, label))
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}

/// Advance an optional bar
pub fn tick(progress: &mut Option<FileProgress>) {
  if let Some(p) = progress.as_mut() {
    p.inc();
  }
}
