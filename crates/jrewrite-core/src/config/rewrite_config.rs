//! Configuration types

use std::path::Path;

use glob::Pattern;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format::{self, FormatOptions};
use crate::{Result, RewriteError};

/// Root of a configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RewriteConfiguration {
    /// JSON schema reference for editor support
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Layout of code created by rewrites
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<FormatterConfiguration>,

    /// Which files the CLI processes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,
}

/// Indent style for created code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces,
    /// Use tabs for indentation
    Tabs,
}

/// Placement of opening braces in created code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum BraceStyle {
    EndOfLine,
    NextLine,
}

/// Formatter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormatterConfiguration {
    #[schemars(description = "Indentation style: 'spaces' or 'tabs'")]
    pub indent_style: Option<IndentStyle>,

    #[schemars(description = "Number of spaces per indentation level")]
    pub indent_size: Option<usize>,

    #[schemars(description = "Width of a tab character for line width calculations")]
    pub tab_width: Option<u32>,

    #[schemars(description = "Maximum line width before wrapping")]
    pub line_width: Option<usize>,

    #[schemars(description = "Opening brace placement: 'endOfLine' or 'nextLine'")]
    pub brace_style: Option<BraceStyle>,

    #[schemars(description = "Insert a space after commas")]
    pub space_after_comma: Option<bool>,

    #[schemars(description = "Surround binary operators with spaces")]
    pub spaces_around_operators: Option<bool>,
}

/// Files configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfiguration {
    /// Glob patterns to include
    #[schemars(description = "Glob patterns for files to include")]
    pub include: Option<Vec<String>>,

    /// Glob patterns to exclude
    #[schemars(description = "Glob patterns for files to exclude")]
    pub exclude: Option<Vec<String>>,
}

impl Default for FilesConfiguration {
    fn default() -> Self {
        Self {
            include: Some(vec!["**/*.java".to_string()]),
            exclude: Some(vec![
                "**/target/**".to_string(),
                "**/build/**".to_string(),
                "**/.git/**".to_string(),
            ]),
        }
    }
}

impl RewriteConfiguration {
    /// Configuration written by `jrewrite config init`
    pub fn recommended() -> Self {
        Self {
            schema: Some("https://jrewrite.github.io/schema/v1.json".to_string()),
            formatter: Some(FormatterConfiguration {
                indent_style: Some(IndentStyle::Spaces),
                indent_size: Some(4),
                tab_width: Some(4),
                line_width: Some(100),
                brace_style: Some(BraceStyle::EndOfLine),
                space_after_comma: Some(true),
                spaces_around_operators: Some(true),
            }),
            files: Some(FilesConfiguration::default()),
        }
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(formatter) = &self.formatter {
            if let Some(size) = formatter.indent_size
                && !(1..=16).contains(&size)
            {
                return Err(RewriteError::config_error(format!(
                    "indentSize must be between 1 and 16, got {size}"
                )));
            }
            if formatter.tab_width == Some(0) {
                return Err(RewriteError::config_error("tabWidth must be at least 1"));
            }
            if let Some(width) = formatter.line_width
                && width < 20
            {
                return Err(RewriteError::config_error(format!(
                    "lineWidth must be at least 20, got {width}"
                )));
            }
        }
        if let Some(files) = &self.files {
            for pattern in files.include.iter().chain(files.exclude.iter()).flatten() {
                Pattern::new(pattern).map_err(|e| {
                    RewriteError::config_error(format!("Invalid glob pattern '{pattern}': {e}"))
                })?;
            }
        }
        Ok(())
    }

    /// Options for the default formatter, unset values taking their defaults
    pub fn format_options(&self) -> FormatOptions {
        self.formatter
            .as_ref()
            .map(FormatterConfiguration::to_format_options)
            .unwrap_or_default()
    }

    pub fn files(&self) -> FilesConfiguration {
        self.files.clone().unwrap_or_default()
    }
}

impl FormatterConfiguration {
    pub fn to_format_options(&self) -> FormatOptions {
        let defaults = FormatOptions::default();
        FormatOptions {
            indent_style: match self.indent_style {
                Some(IndentStyle::Tabs) => format::IndentStyle::Tabs,
                Some(IndentStyle::Spaces) => format::IndentStyle::Spaces,
                None => defaults.indent_style,
            },
            indent_size: self.indent_size.unwrap_or(defaults.indent_size),
            tab_width: self.tab_width.unwrap_or(defaults.tab_width),
            line_width: self.line_width.unwrap_or(defaults.line_width),
            brace_style: match self.brace_style {
                Some(BraceStyle::NextLine) => format::BraceStyle::NextLine,
                Some(BraceStyle::EndOfLine) => format::BraceStyle::EndOfLine,
                None => defaults.brace_style,
            },
            space_after_comma: self.space_after_comma.unwrap_or(defaults.space_after_comma),
            spaces_around_operators: self
                .spaces_around_operators
                .unwrap_or(defaults.spaces_around_operators),
        }
    }
}

impl FilesConfiguration {
    /// Whether `path` matches an include pattern and no exclude pattern
    ///
    /// Without include patterns every `.java` file is included.
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let matches_any = |patterns: &Option<Vec<String>>| {
            patterns.iter().flatten().any(|pattern| {
                Pattern::new(pattern)
                    .map(|p| p.matches(&path_str))
                    .unwrap_or(false)
            })
        };

        let included = match &self.include {
            Some(patterns) if !patterns.is_empty() => matches_any(&self.include),
            _ => path.extension().is_some_and(|ext| ext == "java"),
        };
        included && !matches_any(&self.exclude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_formatter_keeps_defaults() {
        let config: RewriteConfiguration =
            serde_json::from_str(r#"{"formatter": {"indentStyle": "tabs", "braceStyle": "nextLine"}}"#).unwrap();
        let options = config.format_options();
        assert_eq!(options.indent_style, format::IndentStyle::Tabs);
        assert_eq!(options.brace_style, format::BraceStyle::NextLine);
        assert_eq!(options.indent_size, 4);
        assert!(options.space_after_comma);
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = RewriteConfiguration::recommended();
        assert!(config.validate().is_ok());

        if let Some(formatter) = config.formatter.as_mut() {
            formatter.indent_size = Some(0);
        }
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("indentSize"));

        let config = RewriteConfiguration {
            files: Some(FilesConfiguration {
                include: Some(vec!["[".to_string()]),
                exclude: None,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_files_matching() {
        let files = FilesConfiguration::default();
        assert!(files.matches(Path::new("src/main/java/App.java")));
        assert!(!files.matches(Path::new("module/target/gen/App.java")));
        assert!(!files.matches(Path::new("README.md")));

        let no_include = FilesConfiguration {
            include: None,
            exclude: None,
        };
        assert!(no_include.matches(Path::new("A.java")));
    }

    #[test]
    fn test_schema_field_round_trip() {
        let json = serde_json::to_string(&RewriteConfiguration::recommended()).unwrap();
        assert!(json.starts_with(r#"{"$schema":"#));
        let back: RewriteConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RewriteConfiguration::recommended());
    }
}
