//! `sammlungen`: documents generated from the whole registry

use anyhow::Result;
use aufgaben_core::generators::{self, FileChange, TaskFilter};
use aufgaben_core::readme;
use aufgaben_core::{Registry, TaskKind};
use std::path::Path;
use tracing::info;

use super::load_registry;
use crate::cli::app::{CollectionCommands, TaskCollectionArgs};

fn apply_all(changes: &[FileChange]) -> Result<()> {
    let mut changed = 0;
    for change in changes {
        if change.apply()? {
            changed += 1;
        }
    }
    info!(total = changes.len(), changed, "Files updated");
    Ok(())
}

fn task_filter(args: &TaskCollectionArgs) -> TaskFilter {
    let kind = if args.nur_examen {
        Some(TaskKind::Exam)
    } else if args.nur_module {
        Some(TaskKind::Plain)
    } else {
        None
    };
    TaskFilter { min_processing: args.bearbeitungsstand, min_correctness: args.korrektheit, kind }
}

fn task_collection(registry: &Registry, args: &TaskCollectionArgs) -> Result<()> {
    let target = registry.layout().normalize(&args.ziel);
    let change = generators::task_collection_document(registry, &task_filter(args), target);
    change.apply()?;
    println!("{}", change.path().display());
    Ok(())
}

pub fn execute(config_path: &Path, command: CollectionCommands) -> Result<()> {
    let registry = load_registry(config_path)?;
    match command {
        CollectionCommands::ExamSolutions => apply_all(&generators::exam_solutions(&registry)?),
        CollectionCommands::ExamScans => apply_all(&generators::scan_collections(&registry)?),
        CollectionCommands::Overview => {
            println!("{}", generators::exam_overview(&registry, true)?);
            Ok(())
        }
        CollectionCommands::Tasks(args) => task_collection(&registry, &args),
        CollectionCommands::Readme => {
            let mut changes = vec![readme::main_readme(&registry)?];
            changes.extend(readme::scans_readme(&registry)?);
            apply_all(&changes)
        }
    }
}
