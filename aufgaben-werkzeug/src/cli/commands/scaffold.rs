//! `erzeuge-aufgabe` and `erzeuge-examens-aufgabe`

use anyhow::Result;
use aufgaben_core::generators::{self, FileChange};
use std::path::Path;
use tracing::warn;

use super::{absolute, load_config};
use crate::cli::app::{NewExamTaskArgs, NewTaskArgs};

fn create(change: FileChange) -> Result<()> {
    if !change.apply()? {
        warn!(path = %change.path().display(), "Datei existiert bereits");
    }
    println!("{}", change.path().display());
    Ok(())
}

/// A plain task in the working directory
pub fn execute_task(args: NewTaskArgs) -> Result<()> {
    let directory = absolute(Path::new("."))?;
    create(generators::scaffold_task(&directory, args.titel.as_deref()))
}

pub fn execute_exam_task(config_path: &Path, args: NewExamTaskArgs) -> Result<()> {
    let layout = load_config(config_path)?.layout()?;
    create(generators::scaffold_exam_task(
        &layout,
        &args.referenz,
        args.thema,
        args.teilaufgabe,
        args.aufgabe,
    )?)
}
