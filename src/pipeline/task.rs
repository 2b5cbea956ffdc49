use serde::Serialize;
use std::fmt;

/// One side-effecting pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
  CheckVersions,
  CheckTextDomain,
  MakePot,
  PushTranslations,
  PullTranslations,
  CompileTranslations,
  ConvertReadme,
  CleanStaging,
  StageFiles,
  NormalizeLineEndings,
  Archive,
  Deploy,
}

impl Task {
  pub fn name(self) -> &'static str {
    match self {
      Task::CheckVersions => "check-versions",
      Task::CheckTextDomain => "check-text-domain",
      Task::MakePot => "make-pot",
      Task::PushTranslations => "push-translations",
      Task::PullTranslations => "pull-translations",
      Task::CompileTranslations => "compile-translations",
      Task::ConvertReadme => "convert-readme",
      Task::CleanStaging => "clean-staging",
      Task::StageFiles => "stage-files",
      Task::NormalizeLineEndings => "normalize-line-endings",
      Task::Archive => "archive",
      Task::Deploy => "deploy",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Task::CheckVersions => "Verify plugin, readme, package.json and internal versions agree",
      Task::CheckTextDomain => "Audit localization calls for the plugin text domain",
      Task::MakePot => "Extract translatable strings into the POT catalog",
      Task::PushTranslations => "Push the POT catalog to the translation service",
      Task::PullTranslations => "Pull translated PO files from the translation service",
      Task::CompileTranslations => "Compile PO files into MO files",
      Task::ConvertReadme => "Convert readme.txt into README.md",
      Task::CleanStaging => "Remove and recreate the staging directory",
      Task::StageFiles => "Copy release files into the staging directory",
      Task::NormalizeLineEndings => "Normalize line endings of staged text files",
      Task::Archive => "Zip the staging directory",
      Task::Deploy => "Commit the build to the plugin registry and tag it",
    }
  }
}

impl fmt::Display for Task {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// A named, fixed sequence of tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
  Languages,
  Readme,
  Build,
  Deploy,
}

const LANGUAGES: &[Task] = &[
  Task::CheckTextDomain,
  Task::MakePot,
  Task::PushTranslations,
  Task::PullTranslations,
  Task::CompileTranslations,
];

const README: &[Task] = &[Task::ConvertReadme];

const BUILD: &[Task] = &[
  Task::CheckVersions,
  Task::CheckTextDomain,
  Task::ConvertReadme,
  Task::CleanStaging,
  Task::StageFiles,
  Task::NormalizeLineEndings,
  Task::Archive,
];

const DEPLOY: &[Task] = &[
  Task::CheckVersions,
  Task::CheckTextDomain,
  Task::ConvertReadme,
  Task::CleanStaging,
  Task::StageFiles,
  Task::NormalizeLineEndings,
  Task::Archive,
  Task::Deploy,
];

impl Chain {
  pub fn tasks(self) -> &'static [Task] {
    match self {
      Chain::Languages => LANGUAGES,
      Chain::Readme => README,
      Chain::Build => BUILD,
      Chain::Deploy => DEPLOY,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Chain::Languages => "languages",
      Chain::Readme => "readme",
      Chain::Build => "build",
      Chain::Deploy => "deploy",
    }
  }
}

impl fmt::Display for Chain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}
