//! External program execution
//!
//! The translation service client (`tx`) and the plugin registry client (`svn`) are
//! driven as subprocesses. Everything goes through `ToolRunner` so pipelines can be
//! exercised in tests with a recording runner instead of real network tools.

use crate::core::error::{ReleaseError, ReleaseResult, ToolError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A program invocation, described before it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  /// Build from an argv-style list; `None` for an empty list
  pub fn from_argv(argv: &[String]) -> Option<Self> {
    let (program, args) = argv.split_first()?;
    Some(Self {
      program: program.clone(),
      args: args.to_vec(),
      cwd: None,
    })
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }
}

impl fmt::Display for ToolCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.contains(' ') {
        write!(f, " \"{}\"", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// Runs external programs and returns their stdout
pub trait ToolRunner {
  fn run(&self, cmd: &ToolCommand) -> ReleaseResult<String>;
}

/// Runs programs with `std::process::Command`, blocking until they exit
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
  fn run(&self, cmd: &ToolCommand) -> ReleaseResult<String> {
    tracing::debug!("running: {}", cmd);

    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);
    if let Some(dir) = &cmd.cwd {
      command.current_dir(dir);
    }

    let output = command.output().map_err(|e| {
      ReleaseError::Tool(ToolError::Spawn {
        program: cmd.program.clone(),
        reason: e.to_string(),
      })
    })?;

    if !output.status.success() {
      return Err(ReleaseError::Tool(ToolError::Failed {
        command: cmd.to_string(),
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}
