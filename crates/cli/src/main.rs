//! nbx command line: batch conversion of Databricks notebook exports.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};

mod batch;
mod config;

use config::{AppConfig, LogLevel, TargetFormat};

/// Command-line options; each one overrides the config file when given.
#[derive(Debug, Parser)]
#[command(
    name = "nbx",
    version,
    about = "Convert Databricks notebook exports to notebooks, scripts, and query files"
)]
struct Cli {
    /// Input export file or folder.
    input: Option<PathBuf>,

    /// Output folder mirroring the input tree.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum)]
    format: Option<TargetFormat>,

    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render omission comments instead of embedded-query execution calls.
    #[arg(long)]
    no_extract_sql: bool,

    /// Application name for script prologues.
    #[arg(long)]
    app_name: Option<String>,

    /// Overwrite outputs that already exist.
    #[arg(short = 'F', long)]
    force: bool,

    /// Worker threads (0 means one per core).
    #[arg(short, long)]
    threads: Option<usize>,

    /// Logging verbosity.
    #[arg(short, long, value_enum)]
    log_level: Option<LogLevel>,
}

/// Plain line-per-record logger writing to stderr.
struct StderrLogger;

impl StderrLogger {
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(StderrLogger))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{:>5} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Merges the config file (or defaults) with command-line overrides.
fn resolve(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(input) = &cli.input {
        config.input = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.no_extract_sql {
        config.extract_sql = false;
    }
    if let Some(app_name) = &cli.app_name {
        config.app_name = app_name.clone();
    }
    if cli.force {
        config.force = true;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<batch::BatchStats> {
    let config = resolve(cli)?;
    log::set_max_level(config.log_level.to_filter());
    batch::run(&config)
}

fn main() -> ExitCode {
    if let Err(err) = StderrLogger::init(LevelFilter::Info) {
        eprintln!("logger setup failed: {err}");
        return ExitCode::FAILURE;
    }
    let cli = Cli::parse();
    match run(&cli) {
        Ok(stats) => {
            info!(
                "{} export(s): {} converted, {} failed in {} ms",
                stats.total, stats.succeeded, stats.failed, stats.elapsed_ms
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "nbx",
            "notebooks",
            "-o",
            "out",
            "-f",
            "python-script",
            "--no-extract-sql",
            "--app-name",
            "migrated",
            "-F",
            "-t",
            "4",
            "-l",
            "debug",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("notebooks")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.format, Some(TargetFormat::PythonScript));
        assert!(cli.no_extract_sql);
        assert_eq!(cli.app_name.as_deref(), Some("migrated"));
        assert!(cli.force);
        assert_eq!(cli.threads, Some(4));
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn command_line_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nbx.yml");
        fs::write(
            &config_path,
            format!(
                "input: {}\nformat: scala-script\napp_name: from_file\n",
                dir.path().display()
            ),
        )
        .unwrap();

        let cli = Cli::parse_from([
            "nbx",
            "-c",
            config_path.to_str().unwrap(),
            "-f",
            "sql-script",
        ]);
        let config = resolve(&cli).unwrap();
        assert_eq!(config.format, TargetFormat::SqlScript);
        assert_eq!(config.app_name, "from_file");
        assert_eq!(config.input, dir.path().to_path_buf());
    }

    #[test]
    fn defaults_hold_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from(["nbx", dir.path().to_str().unwrap()]);
        let config = resolve(&cli).unwrap();
        assert_eq!(config.format, TargetFormat::Notebook);
        assert!(config.extract_sql);
        assert!(!config.force);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn missing_input_is_rejected() {
        let cli = Cli::parse_from(["nbx", "no/such/folder"]);
        assert!(resolve(&cli).is_err());
    }
}
