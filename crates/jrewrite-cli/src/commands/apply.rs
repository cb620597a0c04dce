//! `jrewrite apply`: run an edit script over Java sources

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use jrewrite_core::{DefaultFormatter, EditScript, RoundTripValidator, apply_script};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use super::{discover_files, file_filter, load_config};
use crate::OutputFormat;
use crate::output::{ApplyMode, FileReport, OutputFormatter, RunSummary};

pub struct ApplyOptions {
    pub script: PathBuf,
    pub paths: Vec<PathBuf>,
    pub write: bool,
    pub diff: bool,
    pub check: bool,
    pub format: OutputFormat,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub config_path: Option<PathBuf>,
}

impl ApplyOptions {
    fn mode(&self) -> ApplyMode {
        if self.write {
            ApplyMode::Write
        } else if self.diff {
            ApplyMode::Diff
        } else if self.check {
            ApplyMode::Check
        } else {
            ApplyMode::Preview
        }
    }
}

pub fn apply_command(options: ApplyOptions) -> Result<bool> {
    debug!("Running apply command with script {}", options.script.display());
    let script = EditScript::load(&options.script)
        .with_context(|| format!("Cannot load edit script '{}'", options.script.display()))?;
    if let Some(description) = &script.description {
        info!("Script: {}", description);
    }

    let config = load_config(options.config_path.as_deref(), &options.paths)?;
    let formatter = DefaultFormatter::new(config.format_options());
    let files = discover_files(
        &options.paths,
        &file_filter(&config, options.include.clone(), options.exclude.clone()),
    )?;

    if files.is_empty() {
        if options.format == OutputFormat::Human {
            println!("No Java files found in specified paths.");
        }
        return Ok(true);
    }

    let mode = options.mode();
    let start_time = Instant::now();
    let validator = RoundTripValidator::new();
    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| apply_file(path, &script, &formatter, &validator, mode == ApplyMode::Write))
        .collect();

    let summary = RunSummary::from_reports(&reports);
    OutputFormatter::new(options.format).print_apply(&reports, &summary, mode, start_time.elapsed())?;

    let would_change = mode == ApplyMode::Check && summary.files_changed > 0;
    Ok(!summary.has_issues() && !would_change)
}

fn apply_file(
    path: &Path,
    script: &EditScript,
    formatter: &DefaultFormatter,
    validator: &RoundTripValidator,
    write: bool,
) -> FileReport {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return FileReport::with_issue(path, format!("cannot read file: {e}")),
    };

    let script = script.targeting(&source);
    if script.operations.is_empty() {
        return FileReport::new(path);
    }

    let outcome = match apply_script(&source, &script, formatter) {
        Ok(outcome) => outcome,
        Err(e) => {
            // Script errors concern this file only; anything else points at a bug
            if e.is_recoverable() {
                warn!("Script does not apply to {}: {}", path.display(), e);
            } else {
                error!("Rewriting {} failed: {}", path.display(), e);
            }
            return FileReport::with_issue(path, e.to_string());
        }
    };

    let mut report = FileReport::new(path);
    report.applied = outcome.applied;
    report.edits = outcome.edits.len();
    if !outcome.has_changes() {
        return report;
    }

    let validation = validator.validate_rewrite(&source, &outcome.text);
    if !validation.is_valid() {
        warn!("Rewrite of {} failed validation, file left unchanged", path.display());
        report.issues.extend(validation.issues());
        return report;
    }

    report.changed = true;
    if write && let Err(e) = std::fs::write(path, &outcome.text) {
        report.issues.push(format!("cannot write file: {e}"));
        report.changed = false;
    }
    report.original = source;
    report.rewritten = outcome.text;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rename_script() -> EditScript {
        EditScript::from_json(
            r#"{"operations": [{"op": "renameMethod", "typeName": "A", "method": "foo", "newName": "bar"}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_apply_file_without_write_keeps_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("A.java");
        fs::write(&path, "class A {\n    void foo() {}\n}\n").unwrap();

        let report = apply_file(
            &path,
            &rename_script(),
            &DefaultFormatter::default(),
            &RoundTripValidator::new(),
            false,
        );
        assert!(report.changed);
        assert_eq!(report.applied, 1);
        assert!(report.rewritten.contains("void bar()"));
        assert!(fs::read_to_string(&path).unwrap().contains("void foo()"));
    }

    #[test]
    fn test_apply_file_writes_result() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("A.java");
        fs::write(&path, "class A {\n    // keep me\n    void foo() {}\n}\n").unwrap();

        let report = apply_file(
            &path,
            &rename_script(),
            &DefaultFormatter::default(),
            &RoundTripValidator::new(),
            true,
        );
        assert!(!report.has_issues());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "class A {\n    // keep me\n    void bar() {}\n}\n"
        );
    }

    #[test]
    fn test_unmatched_script_leaves_file_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("B.java");
        fs::write(&path, "class B {}\n").unwrap();

        let report = apply_file(
            &path,
            &rename_script(),
            &DefaultFormatter::default(),
            &RoundTripValidator::new(),
            true,
        );
        assert!(!report.changed);
        assert_eq!(report.applied, 0);
    }
}
