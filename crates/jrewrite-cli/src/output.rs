//! Output formatting and reporting

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use colored::*;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::OutputFormat;

/// Per-file result of a command
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    /// Whether the file was (or would be) rewritten
    pub changed: bool,
    /// Operations that changed something
    pub applied: usize,
    pub edits: usize,
    pub issues: Vec<String>,
    #[serde(skip)]
    pub original: String,
    #[serde(skip)]
    pub rewritten: String,
}

impl FileReport {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            changed: false,
            applied: 0,
            edits: 0,
            issues: Vec::new(),
            original: String::new(),
            rewritten: String::new(),
        }
    }

    pub fn with_issue(path: &Path, issue: impl Into<String>) -> Self {
        let mut report = Self::new(path);
        report.issues.push(issue.into());
        report
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Summary statistics over all processed files
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub files_checked: usize,
    pub files_changed: usize,
    pub files_with_issues: usize,
    pub operations_applied: usize,
    pub edits: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        Self {
            files_checked: reports.len(),
            files_changed: reports.iter().filter(|r| r.changed).count(),
            files_with_issues: reports.iter().filter(|r| r.has_issues()).count(),
            operations_applied: reports.iter().map(|r| r.applied).sum(),
            edits: reports.iter().map(|r| r.edits).sum(),
        }
    }

    pub fn has_issues(&self) -> bool {
        self.files_with_issues > 0
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    summary: &'a RunSummary,
}

/// Output formatter for the selected format
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the results of `jrewrite check`
    pub fn print_check(&self, reports: &[FileReport], summary: &RunSummary, elapsed: Duration) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.print_json(reports, summary),
            OutputFormat::Human => {
                for report in reports.iter().filter(|r| r.has_issues()) {
                    self.print_issues(report);
                }
                if summary.has_issues() {
                    println!(
                        "{} {} of {} files have problems",
                        "✗".red(),
                        summary.files_with_issues,
                        summary.files_checked
                    );
                } else {
                    println!("{} {} files parse losslessly", "✓".green(), summary.files_checked);
                }
                println!("Completed in {}", utils::format_duration(elapsed));
                Ok(())
            }
        }
    }

    /// Print the results of `jrewrite apply`
    pub fn print_apply(
        &self,
        reports: &[FileReport],
        summary: &RunSummary,
        mode: ApplyMode,
        elapsed: Duration,
    ) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.print_json(reports, summary);
        }

        for report in reports {
            if report.has_issues() {
                self.print_issues(report);
            }
            if !report.changed {
                continue;
            }
            match mode {
                ApplyMode::Diff => print!("{}", render_diff(&report.path, &report.original, &report.rewritten)),
                ApplyMode::Write => println!("{} {}", "rewrote".green(), report.path.display()),
                ApplyMode::Check | ApplyMode::Preview => {
                    println!("{} {}", "would rewrite".yellow(), report.path.display())
                }
            }
        }

        println!("\n{}", "Summary:".bold());
        println!("  Files checked: {}", summary.files_checked);
        let verb = if mode == ApplyMode::Write { "Files rewritten" } else { "Files to rewrite" };
        println!("  {}: {}", verb, summary.files_changed.to_string().cyan());
        println!("  Operations applied: {}", summary.operations_applied);
        println!("  Text edits: {}", summary.edits);
        if summary.has_issues() {
            println!("  Files with problems: {}", summary.files_with_issues.to_string().red());
        }
        if mode == ApplyMode::Preview && summary.files_changed > 0 {
            println!(
                "\n{}",
                "Run with --write to apply these changes or --diff to review them".dimmed()
            );
        }
        println!("\nCompleted in {}", utils::format_duration(elapsed));
        Ok(())
    }

    fn print_issues(&self, report: &FileReport) {
        for issue in &report.issues {
            eprintln!("{}: {}: {}", "error".red().bold(), report.path.display(), issue);
        }
    }

    fn print_json(&self, reports: &[FileReport], summary: &RunSummary) -> Result<()> {
        let report = JsonReport {
            files: reports,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

/// How `jrewrite apply` handles rewritten sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    Preview,
    Write,
    Diff,
    Check,
}

/// Colored unified diff of one file
pub fn render_diff(path: &Path, original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let name = path.display().to_string();
    let mut output = format!(
        "{}\n{}\n",
        format!("--- a/{name}").bold(),
        format!("+++ b/{name}").bold()
    );

    for group in diff.grouped_ops(3) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old = first.old_range().start..last.old_range().end;
        let new = first.new_range().start..last.new_range().end;
        output.push_str(
            &format!(
                "@@ -{},{} +{},{} @@\n",
                old.start + 1,
                old.len(),
                new.start + 1,
                new.len()
            )
            .cyan()
            .to_string(),
        );

        for op in &group {
            for change in diff.iter_changes(op) {
                let line = match change.tag() {
                    ChangeTag::Delete => format!("-{}", change.value()).red().to_string(),
                    ChangeTag::Insert => format!("+{}", change.value()).green().to_string(),
                    ChangeTag::Equal => format!(" {}", change.value()),
                };
                output.push_str(&line);
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }
    output
}

pub mod utils {
    use std::time::Duration;

    /// Format duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let millis = duration.as_millis();
        if millis < 1000 {
            format!("{millis}ms")
        } else {
            format!("{:.2}s", duration.as_secs_f64())
        }
    }
}
