//! Task chains: fixed, fail-fast sequences of release steps
//!
//! A chain runs its tasks in order and stops at the first failure; nothing is retried
//! and nothing after the failing task runs. Partial output of earlier tasks stays on
//! disk.

mod task;

pub use task::{Chain, Task};

use crate::assemble::{self, archive_file_name};
use crate::checks::{textdomain, versions};
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::fileset::FileSet;
use crate::core::tools::{ToolCommand, ToolRunner};
use crate::deploy::{BuildArtifact, Deployer};
use crate::{i18n, readme};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Options shared by every task of a run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
  /// Audit findings fail the chain
  pub strict: bool,
  /// Timestamp stamped into generated catalogs
  pub now: DateTime<Utc>,
  /// Print each task and its outcome to stdout
  pub progress: bool,
}

/// State handed from task to task within one chain
#[derive(Debug, Default)]
struct ChainState {
  artifact: Option<BuildArtifact>,
}

/// Outcome of one task
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
  pub task: Task,
  pub summary: String,
}

/// Outcome of a completed chain
#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
  pub chain: Chain,
  pub tasks: Vec<TaskReport>,
  pub artifact: Option<BuildArtifact>,
}

pub struct Pipeline<'a, R: ToolRunner> {
  ctx: &'a ReleaseContext,
  runner: &'a R,
  options: PipelineOptions,
}

impl<'a, R: ToolRunner> Pipeline<'a, R> {
  pub fn new(ctx: &'a ReleaseContext, runner: &'a R, options: PipelineOptions) -> Self {
    Self { ctx, runner, options }
  }

  /// Run every task of `chain` in order, stopping at the first failure
  pub fn run(&self, chain: Chain) -> ReleaseResult<ChainReport> {
    let mut state = ChainState::default();
    let mut reports = Vec::with_capacity(chain.tasks().len());

    for &task in chain.tasks() {
      if self.options.progress {
        println!("▶ {}", task);
      }
      tracing::debug!("{}: {}", task, task.description());

      match self.run_task(task, &mut state) {
        Ok(summary) => {
          if self.options.progress {
            println!("  ✅ {}", summary);
          }
          reports.push(TaskReport { task, summary });
        }
        Err(err) => {
          if self.options.progress {
            println!("  ❌ {} failed", task);
          }
          tracing::error!("chain '{}' stopped at task '{}'", chain, task);
          return Err(err.context(format!("Task '{}' failed", task)));
        }
      }
    }

    Ok(ChainReport {
      chain,
      tasks: reports,
      artifact: state.artifact,
    })
  }

  fn run_task(&self, task: Task, state: &mut ChainState) -> ReleaseResult<String> {
    let ctx = self.ctx;
    let config = &ctx.config;

    match task {
      Task::CheckVersions => {
        let outcomes = versions::check_versions(ctx)?;
        Ok(match outcomes.first() {
          Some(outcome) => format!("{} version check(s) agree on {}", outcomes.len(), outcome.version),
          None => "no version checks configured".to_string(),
        })
      }

      Task::CheckTextDomain => {
        let findings = textdomain::audit_plugin(ctx)?;
        textdomain::enforce(&findings, self.options.strict || config.audit.strict)?;
        Ok(match findings.len() {
          0 => format!("all localization calls use '{}'", ctx.text_domain()),
          n => format!("{} text domain warning(s)", n),
        })
      }

      Task::MakePot => {
        let report = i18n::make_pot(ctx, self.options.now)?;
        let status = if report.written { "written" } else { "unchanged" };
        Ok(format!(
          "{} {} ({} entries, {} excluded)",
          report.path.display(),
          status,
          report.entries,
          report.excluded
        ))
      }

      Task::PushTranslations => self.external(&config.i18n.push, "push"),

      Task::PullTranslations => self.external(&config.i18n.pull, "pull"),

      Task::CompileTranslations => {
        let compiled = i18n::compile(&ctx.languages_dir(), &config.i18n.compile_pattern)?;
        Ok(format!("{} catalog(s) compiled", compiled.len()))
      }

      Task::ConvertReadme => {
        let output = readme::convert_readme(ctx)?;
        Ok(format!("{} written", output.display()))
      }

      Task::CleanStaging => {
        let dir = ctx.staging_dir();
        assemble::clean(&dir)?;
        Ok(format!("{} is empty", dir.display()))
      }

      Task::StageFiles => {
        let files = FileSet::new(&config.build.files)?;
        let staged = assemble::stage(ctx.root(), &files, &ctx.staging_dir())?;
        Ok(format!("{} files staged", staged.len()))
      }

      Task::NormalizeLineEndings => {
        let files = FileSet::new(&config.build.eol_files)?;
        let rewritten = assemble::normalize_line_endings(&ctx.staging_dir(), &files, config.build.eol)?;
        Ok(format!("{} file(s) converted to {}", rewritten.len(), config.build.eol))
      }

      Task::Archive => {
        // Output paths are templated from package.json, like the name
        let version = versions::VersionOracle::new(ctx).read_version(versions::VersionSource::Manifest)?;
        let name = &ctx.manifest.name;
        let path = ctx.build_dir().join(archive_file_name(name, &version));
        let archive = assemble::archive(&ctx.staging_dir(), &path, name, config.build.compression)?;

        state.artifact = Some(BuildArtifact::new(ctx.staging_dir(), archive.clone(), version));
        Ok(format!("{} created", archive.display()))
      }

      Task::Deploy => {
        let artifact = state.artifact.as_ref().ok_or_else(|| {
          ReleaseError::message("Nothing to deploy: the build chain did not produce an artifact")
        })?;
        let report = Deployer::new(ctx, self.runner).deploy(artifact)?;
        Ok(format!("version {} committed to {}", report.version, report.url))
      }
    }
  }

  /// Run a configured external command; an empty command skips the step
  fn external(&self, argv: &[String], what: &str) -> ReleaseResult<String> {
    let Some(cmd) = ToolCommand::from_argv(argv) else {
      tracing::info!("no {} command configured, skipped", what);
      return Ok(format!("skipped (no {} command)", what));
    };
    let cmd = cmd.current_dir(self.ctx.root());
    self.runner.run(&cmd)?;
    Ok(format!("ran `{}`", cmd))
  }
}
