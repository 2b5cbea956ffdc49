//! Error types for wp-release with contextual messages and exit codes
//!
//! Every fatal condition of a pipeline run maps onto one `ReleaseError`. Audit findings are
//! not errors; they only become one (`Validation`) when the caller asks for strict mode.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for wp-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, missing files, missing patterns)
  User = 1,
  /// System error (external tools, I/O)
  System = 2,
  /// Validation failure (version mismatch, strict audit)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for wp-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors
  Config(ConfigError),

  /// A required pattern was not found in its source file
  Extraction(ExtractionError),

  /// Two version sources disagree
  VersionMismatch(VersionMismatch),

  /// An external program failed or could not be started
  Tool(ToolError),

  /// Validation failures that are not version related (strict audit)
  Validation { reason: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Typed errors keep their variant (and exit code); the context is only attached to
  /// `Message` and `Io` errors.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(e) => ReleaseError::Io(io::Error::new(e.kind(), format!("{}: {}", ctx_str, e))),
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Extraction(_) => ExitCode::User,
      ReleaseError::VersionMismatch(_) => ExitCode::Validation,
      ReleaseError::Validation { .. } => ExitCode::Validation,
      ReleaseError::Tool(_) => ExitCode::System,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Extraction(e) => e.help_message(),
      ReleaseError::VersionMismatch(e) => e.help_message(),
      ReleaseError::Tool(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Extraction(e) => write!(f, "{}", e),
      ReleaseError::VersionMismatch(e) => write!(f, "{}", e),
      ReleaseError::Tool(e) => write!(f, "{}", e),
      ReleaseError::Validation { reason } => write!(f, "Validation failed: {}", reason),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for ReleaseError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ReleaseError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for ReleaseError {
  fn from(err: std::path::StripPrefixError) -> Self {
    ReleaseError::message(format!("Path strip prefix error: {}", err))
  }
}

impl From<walkdir::Error> for ReleaseError {
  fn from(err: walkdir::Error) -> Self {
    ReleaseError::message(format!("Directory walk error: {}", err))
  }
}

impl From<zip::result::ZipError> for ReleaseError {
  fn from(err: zip::result::ZipError) -> Self {
    ReleaseError::message(format!("Zip error: {}", err))
  }
}

impl From<glob::PatternError> for ReleaseError {
  fn from(err: glob::PatternError) -> Self {
    ReleaseError::message(format!("Invalid glob pattern: {}", err))
  }
}

impl From<notify::Error> for ReleaseError {
  fn from(err: notify::Error) -> Self {
    ReleaseError::Io(io::Error::other(format!("File watcher error: {}", err)))
  }
}

impl From<regex::Error> for ReleaseError {
  fn from(err: regex::Error) -> Self {
    ReleaseError::message(format!("Invalid regular expression: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// package.json not found
  ManifestNotFound { path: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  InvalidValue { field: String, reason: String },
}

impl ConfigError {
  pub fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::ManifestNotFound { .. } => {
        Some("Run wp-release from the plugin root, or pass the root with -C <dir>.".to_string())
      }
      ConfigError::MissingField { .. } => Some("Run `wp-release init` to write a complete release.toml.".to_string()),
      ConfigError::InvalidValue { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::ManifestNotFound { path } => {
        write!(f, "Package manifest not found: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidValue { field, reason } => {
        write!(f, "Invalid value for '{}': {}", field, reason)
      }
    }
  }
}

/// A required pattern was absent from its source
#[derive(Debug)]
pub struct ExtractionError {
  /// File that was searched
  pub path: PathBuf,
  /// Human-readable description of what was expected
  pub pattern: String,
}

impl ExtractionError {
  pub fn help_message(&self) -> Option<String> {
    Some(format!(
      "Add the missing '{}' entry to {} before releasing.",
      self.pattern,
      self.path.display()
    ))
  }
}

impl fmt::Display for ExtractionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Could not find {} in {}", self.pattern, self.path.display())
  }
}

/// A pairwise version check failed
#[derive(Debug)]
pub struct VersionMismatch {
  /// Name of the failing check (e.g. `plugin_vs_readme`)
  pub check: String,
  pub left_source: String,
  pub left: String,
  pub right_source: String,
  pub right: String,
}

impl VersionMismatch {
  pub fn help_message(&self) -> Option<String> {
    Some(format!(
      "Bump the {} version and the {} version to the same value.",
      self.left_source, self.right_source
    ))
  }
}

impl fmt::Display for VersionMismatch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Version check '{}' failed: {} version '{}' != {} version '{}'",
      self.check, self.left_source, self.left, self.right_source, self.right
    )
  }
}

/// External program errors
#[derive(Debug)]
pub enum ToolError {
  /// Program could not be started
  Spawn { program: String, reason: String },

  /// Program exited unsuccessfully
  Failed {
    command: String,
    status: Option<i32>,
    stderr: String,
  },
}

impl ToolError {
  pub fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { program, .. } => Some(format!("Make sure `{}` is installed and on PATH.", program)),
      ToolError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { program, reason } => write!(f, "Failed to run {}: {}", program, reason),
      ToolError::Failed { command, status, stderr } => {
        match status {
          Some(code) => write!(f, "Command failed with exit code {}: {}", code, command)?,
          None => write!(f, "Command terminated by signal: {}", command)?,
        }
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for wp-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
