//! `metadaten`: regenerate the metadata block of one task file

use anyhow::{Result, anyhow};
use aufgaben_core::Task;
use aufgaben_core::generators;
use std::path::Path;
use tracing::info;

use super::{absolute, load_config};
use crate::cli::app::MetadataArgs;

pub fn execute(config_path: &Path, args: MetadataArgs) -> Result<()> {
    let layout = load_config(config_path)?.layout()?;
    let path = absolute(&args.datei)?;
    let task = Task::load(&layout, &path)?
        .ok_or_else(|| anyhow!("Keine Aufgabe: {}", path.display()))?;

    for issue in task.data().status_issues() {
        println!("{issue}");
    }

    match generators::update_metadata(&task) {
        Some(change) => {
            change.apply()?;
        }
        None => info!(path = %path.display(), "Metadata up to date"),
    }
    println!("{}", generators::metadata_block(&task));
    Ok(())
}
