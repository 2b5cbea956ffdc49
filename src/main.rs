mod assemble;
mod checks;
mod commands;
mod core;
mod deploy;
mod i18n;
mod pipeline;
mod readme;
mod ui;

use clap::{Args, Parser, Subcommand};
use core::error::{ReleaseError, print_error};
use pipeline::Chain;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build, translate, package and deploy WordPress plugins
#[derive(Parser)]
#[command(name = "wp-release")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Run as if started in <DIR>
  #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
  dir: Option<PathBuf>,

  /// More diagnostics (-v debug, -vv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Only log errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Release chains
  // ============================================================================
  /// Audit, extract the POT catalog, sync translations, compile MO files
  Languages(ChainArgs),

  /// Convert readme.txt to README.md
  Readme(ChainArgs),

  /// Check versions, stage the plugin and write the release zip
  Build(ChainArgs),

  /// Build, then commit trunk and a release tag to the plugin SVN repository
  Deploy(ChainArgs),

  // ============================================================================
  // Setup & Inspection
  // ============================================================================
  /// Write a default release.toml
  Init {
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },

  /// Run the version consistency checks
  Versions {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Audit localization calls for the plugin text domain
  Audit {
    /// Output findings in JSON format
    #[arg(long)]
    json: bool,
    /// Treat findings as errors
    #[arg(long)]
    strict: bool,
  },

  /// Run every pre-release check and report the results
  Check {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Regenerate README.md whenever readme.txt changes
  Watch,
}

#[derive(Args)]
struct ChainArgs {
  /// Print the task list without running it
  #[arg(long)]
  dry_run: bool,
  /// Treat text-domain findings as errors
  #[arg(long)]
  strict: bool,
  /// Output the chain report in JSON format
  #[arg(long)]
  json: bool,
}

impl ChainArgs {
  fn flags(&self) -> commands::ChainFlags {
    commands::ChainFlags {
      dry_run: self.dry_run,
      strict: self.strict,
      json: self.json,
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: u8, quiet: bool) {
  let filter = if quiet {
    EnvFilter::new("error")
  } else {
    match verbose {
      0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
      1 => EnvFilter::new("debug"),
      _ => EnvFilter::new("trace"),
    }
  };

  // stdout carries reports and --json output
  tracing_subscriber::registry()
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .with(filter)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose, cli.quiet);

  let root = match resolve_root(cli.dir) {
    Ok(root) => root,
    Err(e) => handle_error(e),
  };

  // init runs before release.toml (and possibly package.json) exists
  if let Commands::Init { force } = cli.command {
    if let Err(err) = commands::run_init(&root, force) {
      handle_error(err);
    }
    return;
  }

  // Build the release context once (config, manifest)
  let ctx = match core::context::ReleaseContext::build(&root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Languages(args) => commands::run_chain(&ctx, Chain::Languages, args.flags()),
    Commands::Readme(args) => commands::run_chain(&ctx, Chain::Readme, args.flags()),
    Commands::Build(args) => commands::run_chain(&ctx, Chain::Build, args.flags()),
    Commands::Deploy(args) => commands::run_chain(&ctx, Chain::Deploy, args.flags()),
    Commands::Versions { json } => commands::run_versions(&ctx, json),
    Commands::Audit { json, strict } => commands::run_audit(&ctx, json, strict),
    Commands::Check { json } => commands::run_check(&ctx, json),
    Commands::Watch => commands::run_watch(&ctx),
    Commands::Init { .. } => Ok(()),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn resolve_root(dir: Option<PathBuf>) -> core::error::ReleaseResult<PathBuf> {
  use core::error::ResultExt;

  let root = match dir {
    Some(dir) => dir,
    None => std::env::current_dir().context("Failed to get current directory")?,
  };
  root
    .canonicalize()
    .with_context(|| format!("Working tree not found: {}", root.display()))
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
