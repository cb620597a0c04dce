//! `jrewrite check`: verify that sources parse without loss

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use jrewrite_core::RoundTripValidator;
use rayon::prelude::*;
use tracing::debug;

use super::{discover_files, file_filter, load_config};
use crate::OutputFormat;
use crate::output::{FileReport, OutputFormatter, RunSummary};

pub fn check_command(
    paths: Vec<PathBuf>,
    format: OutputFormat,
    include: Vec<String>,
    exclude: Vec<String>,
    config_path: Option<PathBuf>,
) -> Result<bool> {
    debug!("Running check command on paths: {:?}", paths);
    let config = load_config(config_path.as_deref(), &paths)?;
    let files = discover_files(&paths, &file_filter(&config, include, exclude))?;

    if files.is_empty() {
        if format == OutputFormat::Human {
            println!("No Java files found in specified paths.");
        }
        return Ok(true);
    }

    let start_time = Instant::now();
    let validator = RoundTripValidator::new();
    let reports: Vec<FileReport> = files.par_iter().map(|path| check_file(&validator, path)).collect();

    let summary = RunSummary::from_reports(&reports);
    OutputFormatter::new(format).print_check(&reports, &summary, start_time.elapsed())?;
    Ok(!summary.has_issues())
}

fn check_file(validator: &RoundTripValidator, path: &Path) -> FileReport {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return FileReport::with_issue(path, format!("cannot read file: {e}")),
    };

    let result = validator.validate_source(&source);
    let mut report = FileReport::new(path);
    report.issues.extend(result.issues());
    report.issues.extend(result.original_errors);
    report
}
