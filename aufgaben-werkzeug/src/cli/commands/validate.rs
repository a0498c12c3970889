//! `validiere`: list every task with a status value outside its scale

use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

use super::{load_registry, open_program};
use crate::cli::app::ValidateArgs;

pub fn execute(config_path: &Path, args: ValidateArgs) -> Result<()> {
    let registry = load_registry(config_path)?;
    let issues = registry.status_issues();
    if issues.is_empty() {
        info!("Keine ungültigen Metadaten gefunden");
        return Ok(());
    }

    let mut files = BTreeSet::new();
    for (task, issue) in &issues {
        println!("{}: {issue}", task.relative_path());
        files.insert(task.path());
    }
    info!(issues = issues.len(), files = files.len(), "Invalid metadata found");

    if args.oeffne_editor {
        let editor = &registry.config().editor;
        for file in files {
            open_program(editor, file)?;
        }
    }
    Ok(())
}
