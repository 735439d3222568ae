//! CLI command implementations

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{error, info, print_report_lines, print_report_table, success, warn, OutputFormat};
use crate::config::{self, Config};
use crate::patch::{self, Patcher, WriteMode};

/// Patch the settings file
pub fn apply(
    config_path: Option<&Path>,
    settings: Option<PathBuf>,
    dry_run: bool,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let path = settings.unwrap_or_else(|| config.settings_path.clone());
    let mode = if dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };

    let report = match Patcher::new(&config).patch_file(&path, mode) {
        Ok(report) => report,
        Err(e) => {
            error(&format!("Failed to patch {}: {}", path.display(), e));
            return Err(e.into());
        }
    };

    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Yaml => println!("{}", report.to_yaml()?),
        OutputFormat::Table if quiet => {}
        OutputFormat::Table => {
            print_report_table(&report);
            if report.written {
                success(&format!("Patched {}", path.display()));
            } else if report.changed {
                info(&format!("Dry run: {} was not modified", path.display()));
            } else {
                info(&format!("{} is already up to date", path.display()));
            }
        }
    }

    Ok(())
}

/// Report whether the settings file still needs patching
pub fn check(config_path: Option<&Path>, settings: Option<PathBuf>, quiet: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let path = settings.unwrap_or_else(|| config.settings_path.clone());

    let report = Patcher::new(&config).patch_file(&path, WriteMode::DryRun)?;

    if !quiet {
        print_report_lines(&report);
    }

    if report.changed {
        bail!("{} needs patching", path.display());
    }

    if !quiet {
        success(&format!("{} is up to date", path.display()));
    }
    Ok(())
}

/// Print the block appended by the CORS step
pub fn block(config_path: Option<&Path>) -> Result<()> {
    print!("{}", block_text(config_path)?);
    Ok(())
}

/// The CORS step's block without its leading blank lines
pub fn block_text(config_path: Option<&Path>) -> Result<String> {
    let config = load_config(config_path)?;
    let rendered = patch::render_cors_block(&config)?;
    Ok(rendered.trim_start_matches('\n').to_string())
}

/// Write a default config file to `config_path`
pub fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        warn(&format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        ));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", config_path.display()));
    info("Edit the configuration file and run 'settings-patcher apply'");

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match config::load_config(path) {
        Ok(config) => Ok(config),
        Err(e) => {
            error(&format!("Failed to load config: {}", e));
            Err(e.into())
        }
    }
}
