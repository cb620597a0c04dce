//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use super::RewriteConfiguration;
use crate::{Result, RewriteError};

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: [&str; 3] = [".jrewrite.json", ".jrewrite.jsonc", "jrewrite.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Find a config file in `start_path` or one of its ancestors
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| RewriteError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load and validate a config file; JSONC syntax is accepted for every name
    pub fn load_from_file(path: &Path) -> Result<RewriteConfiguration> {
        let content = fs::read_to_string(path).map_err(|e| {
            RewriteError::config_error(format!("Cannot read config file '{}': {}", path.display(), e))
        })?;

        let config: RewriteConfiguration = json5::from_str(&content).map_err(|e| {
            RewriteError::config_error(format!("Invalid JSON in '{}': {}", path.display(), e))
        })?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Load config from an explicit path, or discover one from `start_dir`
    ///
    /// Returns the default configuration when nothing is found, together
    /// with the path that was loaded.
    pub fn load(
        custom_path: Option<&Path>,
        start_dir: Option<&Path>,
    ) -> Result<(RewriteConfiguration, Option<PathBuf>)> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(RewriteError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok((Self::load_from_file(path)?, Some(path.to_path_buf())));
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Ok((Self::load_from_file(&path)?, Some(path))),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok((RewriteConfiguration::default(), None))
            }
        }
    }

    /// JSON schema of the configuration file
    pub fn schema() -> Result<serde_json::Value> {
        let schema = schemars::schema_for!(RewriteConfiguration);
        let mut value = serde_json::to_value(schema)
            .map_err(|e| RewriteError::internal_error(format!("Cannot serialize schema: {e}")))?;
        value["$id"] = serde_json::json!("https://jrewrite.github.io/schema/v1.json");
        value["title"] = serde_json::json!("jrewrite configuration");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_jsonc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".jrewrite.jsonc",
            r#"{
                // two-space projects
                "formatter": {
                    "indentSize": 2,
                },
            }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.formatter.unwrap().indent_size, Some(2));
    }

    #[test]
    fn test_auto_discover_from_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/main/java");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "jrewrite.json", "{}");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "jrewrite.json");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "jrewrite.json", "{}");
        create_temp_config(temp_dir.path(), ".jrewrite.json", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".jrewrite.json");
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let (config, path) = ConfigLoader::load(None, Some(temp_dir.path())).unwrap();
        // An ancestor of the temp dir may carry a config; only check the empty case
        if path.is_none() {
            assert_eq!(config, RewriteConfiguration::default());
        }
    }

    #[test]
    fn test_invalid_files() {
        assert!(ConfigLoader::load_from_file(Path::new("nonexistent.json")).is_err());
        assert!(ConfigLoader::load(Some(Path::new("nonexistent.json")), None).is_err());

        let temp_dir = TempDir::new().unwrap();
        let broken = create_temp_config(temp_dir.path(), "broken.json", "{ invalid json }");
        assert!(ConfigLoader::load_from_file(&broken).is_err());

        let out_of_range =
            create_temp_config(temp_dir.path(), "wide.json", r#"{"formatter": {"lineWidth": 5}}"#);
        let err = ConfigLoader::load_from_file(&out_of_range).unwrap_err();
        assert!(err.to_string().contains("lineWidth"));
    }

    #[test]
    fn test_schema_mentions_sections() {
        let schema = ConfigLoader::schema().unwrap();
        let text = schema.to_string();
        assert!(text.contains("formatter"));
        assert!(text.contains("indentSize"));
        assert_eq!(schema["title"], "jrewrite configuration");
    }
}
