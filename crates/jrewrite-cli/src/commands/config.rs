//! `jrewrite config`: configuration file management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::*;
use jrewrite_core::{CONFIG_FILE_NAMES, ConfigLoader, RewriteConfiguration};

pub fn init_command(force: bool) -> Result<bool> {
    let path = Path::new(CONFIG_FILE_NAMES[0]);
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file {} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let content = serde_json::to_string_pretty(&RewriteConfiguration::recommended())?;
    std::fs::write(path, content + "\n")
        .with_context(|| format!("Cannot write {}", path.display()))?;

    println!("{} Created configuration file: {}", "✓".green(), path.display());
    Ok(true)
}

pub fn show_command(config_path: Option<PathBuf>) -> Result<bool> {
    let (config, loaded_from) = ConfigLoader::load(config_path.as_deref(), None)?;
    match loaded_from {
        Some(path) => eprintln!("{} {}", "Configuration from".dimmed(), path.display()),
        None => eprintln!("{}", "No configuration file found, showing defaults".dimmed()),
    }

    // Fill in defaults so the output shows the effective values
    let effective = RewriteConfiguration {
        formatter: Some(config.formatter.clone().unwrap_or_else(|| {
            RewriteConfiguration::recommended().formatter.unwrap_or_default()
        })),
        files: Some(config.files()),
        ..config
    };
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(true)
}

pub fn schema_command(output: Option<PathBuf>) -> Result<bool> {
    let schema = serde_json::to_string_pretty(&ConfigLoader::schema()?)?;
    match output {
        Some(path) => {
            std::fs::write(&path, schema + "\n")
                .with_context(|| format!("Cannot write {}", path.display()))?;
            println!("{} Wrote schema to {}", "✓".green(), path.display());
        }
        None => println!("{schema}"),
    }
    Ok(true)
}
