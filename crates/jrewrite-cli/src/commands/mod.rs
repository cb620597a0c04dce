//! Command implementations

pub mod apply;
pub mod check;
pub mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jrewrite_core::{ConfigLoader, FilesConfiguration, RewriteConfiguration};
use tracing::debug;
use walkdir::WalkDir;

/// Load the explicit config, or discover one starting next to the first path
pub(crate) fn load_config(
    config_path: Option<&Path>,
    paths: &[PathBuf],
) -> Result<RewriteConfiguration> {
    let start_dir = paths.first().map(|path| {
        if path.is_file() {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            }
        } else {
            path.as_path()
        }
    });

    let (config, loaded_from) = ConfigLoader::load(config_path, start_dir)?;
    match loaded_from {
        Some(path) => debug!("Using configuration from {}", path.display()),
        None => debug!("Using default configuration"),
    }
    Ok(config)
}

/// File filter from the configuration with CLI patterns taking precedence
pub(crate) fn file_filter(
    config: &RewriteConfiguration,
    include: Vec<String>,
    exclude: Vec<String>,
) -> FilesConfiguration {
    let mut files = config.files();
    if !include.is_empty() {
        files.include = Some(include);
    }
    if !exclude.is_empty() {
        files.exclude = Some(exclude);
    }
    files
}

/// Java files under `paths`; files named explicitly skip the include filter
pub(crate) fn discover_files(paths: &[PathBuf], files: &FilesConfiguration) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for path in paths {
        if path.is_file() {
            found.push(path.clone());
            continue;
        }
        if !path.exists() {
            anyhow::bail!("Path not found: {}", path.display());
        }

        for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Cannot walk {}", path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
            if files.matches(relative) {
                found.push(entry.into_path());
            }
        }
    }
    found.sort();
    found.dedup();
    debug!("Found {} Java files", found.len());
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_respects_excludes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/app")).unwrap();
        fs::create_dir_all(root.join("target/gen")).unwrap();
        fs::write(root.join("src/app/Main.java"), "class Main {}").unwrap();
        fs::write(root.join("src/app/notes.txt"), "").unwrap();
        fs::write(root.join("target/gen/Gen.java"), "class Gen {}").unwrap();

        let files = discover_files(&[root.to_path_buf()], &FilesConfiguration::default()).unwrap();
        assert_eq!(files, vec![root.join("src/app/Main.java")]);
    }

    #[test]
    fn test_cli_patterns_override_config() {
        let config = RewriteConfiguration::default();
        let files = file_filter(&config, vec!["src/**/*.java".into()], Vec::new());
        assert!(files.matches(Path::new("src/A.java")));
        assert!(!files.matches(Path::new("test/A.java")));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let result = discover_files(&[PathBuf::from("does/not/exist")], &FilesConfiguration::default());
        assert!(result.is_err());
    }
}
