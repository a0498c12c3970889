//! Command handlers. Each loads the configuration, builds what it needs from
//! the core and writes the results.

pub mod collections;
pub mod edit;
pub mod metadata;
pub mod open;
pub mod scaffold;
pub mod validate;

use anyhow::{Context, Result, bail};
use aufgaben_core::{Config, Registry};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub(crate) fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Konfiguration nicht lesbar: {}", path.display()))
}

/// Configuration plus the scanned exams and tasks
pub(crate) fn load_registry(path: &Path) -> Result<Registry> {
    let registry = Registry::load(load_config(path)?)?;
    info!(exams = registry.exams().len(), tasks = registry.tasks().len(), "Registry loaded");
    Ok(registry)
}

/// Relative paths are taken relative to the working directory
pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir().context("Arbeitsverzeichnis nicht lesbar")?.join(path))
}

/// Run an external program on a file and wait for it
pub(crate) fn open_program(program: &str, file: &Path) -> Result<()> {
    debug!(program, file = %file.display(), "Opening file");
    let status = Command::new(program)
        .arg(file)
        .status()
        .with_context(|| format!("Konnte {program} nicht starten"))?;
    if !status.success() {
        bail!("{program} beendet mit {status}");
    }
    Ok(())
}
