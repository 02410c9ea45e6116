//! Batch conversion: walk an input tree, convert every export in parallel,
//! mirror the tree under the output folder, and write one merged inventory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use nbx_core::SourceDocument;
use nbx_spark::{Inventory, Options, Target, convert};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::{AppConfig, TargetFormat};

/// Extensions a notebook export may carry.
const EXPORT_EXTENSIONS: [&str; 3] = ["py", "scala", "sql"];

/// Outcome counters for one batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchStats {
    /// Exports discovered under the input.
    pub total: u32,
    /// Documents converted and written.
    pub succeeded: u32,
    /// Documents skipped after an error.
    pub failed: u32,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
}

/// One line of the merged inventory, serialized as a CSV record.
#[derive(Debug, Clone, Serialize)]
struct InventoryRow {
    file: String,
    code_lines: usize,
    comment_lines: usize,
    sql_lines: usize,
    other_lines: usize,
}

/// Collects every export under `input`, sorted for stable output.
///
/// A file input is taken as-is; a folder is walked recursively and filtered
/// by extension. Non-export files are left alone.
pub fn discover(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", input.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_export = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                EXPORT_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            });
        if is_export {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Runs one batch conversion under the given settings.
///
/// Documents are independent: each is read, converted, and written on a
/// worker thread, and a failure in one never aborts the rest. The merged
/// inventory lands in `inventory.csv` under the output folder when at least
/// one document converted.
pub fn run(config: &AppConfig) -> Result<BatchStats> {
    let started = Instant::now();
    let files = discover(&config.input)?;
    if files.is_empty() {
        warn!("no notebook exports under {}", config.input.display());
    }

    if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
            .ok();
    }

    let base = if config.input.is_file() {
        config
            .input
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .to_path_buf()
    } else {
        config.input.clone()
    };
    let target = config.format.to_target();
    let options = config.options();
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("template is a compile-time constant"),
    );

    let rows: Vec<(String, Inventory)> = files
        .par_iter()
        .filter_map(|path| {
            let row = match process_document(path, &base, config, target, &options) {
                Ok(row) => {
                    succeeded.fetch_add(1, Ordering::Relaxed);
                    Some(row)
                }
                Err(err) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    error!("{}: {err:#}", path.display());
                    None
                }
            };
            progress.inc(1);
            row
        })
        .collect();
    progress.finish_and_clear();

    if !rows.is_empty() {
        write_inventory(&config.output, &rows)?;
        let mut totals = Inventory::default();
        for (_, inventory) in &rows {
            totals.merge(inventory);
        }
        info!(
            "inventory totals: {} code, {} comment, {} sql, {} other line(s)",
            totals.code_lines, totals.comment_lines, totals.sql_lines, totals.other_lines
        );
    }

    Ok(BatchStats {
        total: files.len() as u32,
        succeeded: succeeded.into_inner(),
        failed: failed.into_inner(),
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

/// Converts one export and writes its artifact under the output folder.
fn process_document(
    path: &Path,
    base: &Path,
    config: &AppConfig,
    target: Target,
    options: &Options,
) -> Result<(String, Inventory)> {
    let rel = path
        .strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf());
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = SourceDocument::parse(rel.clone(), &text)?;
    let conversion = convert(&doc, target, options)?;
    for warning in &conversion.diagnostics.warnings {
        warn!("{}: {warning}", rel.display());
    }

    let out_path = output_path(&config.output, &rel, config.format);
    if out_path.exists() && !config.force {
        bail!("{} exists (pass --force to overwrite)", out_path.display());
    }
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let output = conversion.artifact.to_output()?;
    fs::write(&out_path, output).with_context(|| format!("writing {}", out_path.display()))?;
    debug!("{} -> {}", rel.display(), out_path.display());

    Ok((rel.display().to_string(), conversion.inventory))
}

/// Output location mirroring the document's place in the input tree.
fn output_path(output: &Path, rel: &Path, format: TargetFormat) -> PathBuf {
    output.join(rel).with_extension(format.extension())
}

/// Writes the merged inventory CSV under the output folder.
fn write_inventory(output: &Path, rows: &[(String, Inventory)]) -> Result<()> {
    fs::create_dir_all(output)
        .with_context(|| format!("creating {}", output.display()))?;
    let path = output.join("inventory.csv");
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("opening {}", path.display()))?;
    for (file, inventory) in rows {
        writer.serialize(InventoryRow {
            file: file.clone(),
            code_lines: inventory.code_lines,
            comment_lines: inventory.comment_lines,
            sql_lines: inventory.sql_lines,
            other_lines: inventory.other_lines,
        })?;
    }
    writer.flush()?;
    Ok(())
}
