//! Batch configuration: file-backed defaults with command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use log::LevelFilter;
use nbx_core::Language;
use nbx_spark::{Options, Target};
use serde::{Deserialize, Serialize};

/// Selectable output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFormat {
    /// Structured interchange notebook (`.ipynb`).
    Notebook,
    /// Flat Python script (`.py`).
    PythonScript,
    /// Flat Scala script (`.scala`).
    ScalaScript,
    /// Query-only script (`.sql`).
    SqlScript,
}

impl TargetFormat {
    /// Engine target selector for this format.
    pub fn to_target(self) -> Target {
        match self {
            TargetFormat::Notebook => Target::Notebook,
            TargetFormat::PythonScript => Target::Script(Language::Python),
            TargetFormat::ScalaScript => Target::Script(Language::Scala),
            TargetFormat::SqlScript => Target::QueryOnly,
        }
    }

    /// File extension written under the output folder.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Notebook => "ipynb",
            TargetFormat::PythonScript => "py",
            TargetFormat::ScalaScript => "scala",
            TargetFormat::SqlScript => "sql",
        }
    }
}

/// Logging verbosity, selectable from the config file or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// Normal operation (default).
    Info,
    /// Per-document tracing.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Level filter handed to the logger.
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Resolved settings for one batch run.
///
/// Every field has a default so a config file may specify any subset;
/// command-line flags override whatever the file says.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input export file or folder to walk.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Output folder mirroring the input tree.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Requested output format.
    #[serde(default = "default_format")]
    pub format: TargetFormat,
    /// Whether embedded queries render as execution calls in flat scripts.
    #[serde(default = "default_extract_sql")]
    pub extract_sql: bool,
    /// Application name baked into script prologues.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Overwrite outputs that already exist.
    #[serde(default)]
    pub force: bool,
    /// Worker threads; zero means one per core.
    #[serde(default)]
    pub threads: usize,
    /// Logging verbosity.
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

fn default_input() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("output")
}

fn default_format() -> TargetFormat {
    TargetFormat::Notebook
}

fn default_extract_sql() -> bool {
    true
}

fn default_app_name() -> String {
    "appName".to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            format: default_format(),
            extract_sql: default_extract_sql(),
            app_name: default_app_name(),
            force: false,
            threads: 0,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Loads settings from a YAML file.
    pub fn from_file(path: &Path) -> Result<AppConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Checks the settings are runnable.
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            bail!("input {} does not exist", self.input.display());
        }
        if self.app_name.trim().is_empty() {
            bail!("app-name must not be blank");
        }
        Ok(())
    }

    /// Conversion options shared by every document in the batch.
    pub fn options(&self) -> Options {
        Options {
            extract_sql: self.extract_sql,
            app_name: self.app_name.clone(),
        }
    }
}
