//! `code` and `oeffne-stichwort`: open task files in the configured editor

use anyhow::{Context, Result, bail};
use aufgaben_core::TaskData;
use aufgaben_core::collection::find_files;
use std::path::Path;
use tracing::info;

use super::{load_config, load_registry, open_program};
use crate::cli::app::{CodeArgs, OpenKeywordArgs};

/// Which of the matched files are opened. With both flags a file missing
/// either keywords or a title is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct EditFilter {
    without_keywords: bool,
    without_title: bool,
}

impl EditFilter {
    fn from_args(args: &CodeArgs) -> Self {
        Self { without_keywords: args.kein_index, without_title: args.kein_titel }
    }

    fn is_active(&self) -> bool {
        self.without_keywords || self.without_title
    }

    fn matches(&self, task: &TaskData) -> bool {
        (self.without_keywords && task.keywords().is_empty()) || (self.without_title && !task.has_title())
    }
}

pub fn execute(config_path: &Path, args: CodeArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let layout = config.layout()?;
    let filter = EditFilter::from_args(&args);
    let cwd = std::env::current_dir().context("Arbeitsverzeichnis nicht lesbar")?;

    let files = find_files(&cwd, &args.glob)?;
    let mut opened = 0;
    for file in &files {
        if filter.is_active() && !filter.matches(&TaskData::load(&layout, file)?) {
            continue;
        }
        println!("{}", file.display());
        open_program(&config.editor, file)?;
        opened += 1;
    }
    info!(matched = files.len(), opened, "Files opened");
    Ok(())
}

pub fn execute_keyword(config_path: &Path, args: OpenKeywordArgs) -> Result<()> {
    let registry = load_registry(config_path)?;
    let Some(vocabulary) = registry.keywords() else {
        bail!("Kein Stichwortverzeichnis im Repository gefunden");
    };
    let keyword = args.stichwort.as_str();
    if !vocabulary.contains(keyword) {
        match vocabulary.suggest(keyword) {
            Some(suggestion) => println!("Das Stichwort „{keyword}“ gibt es nicht. War „{suggestion}“ gemeint?"),
            None => println!("Das Stichwort „{keyword}“ gibt es nicht."),
        }
        return Ok(());
    }

    let index = registry.keyword_index();
    let tasks = index.tasks_with(keyword);
    for task in tasks {
        println!("{}", task.embed_macro());
        open_program(&registry.config().editor, task.path())?;
    }
    info!(keyword, tasks = tasks.len(), "Tasks opened");
    Ok(())
}
