//! `README.md` of the task repository and of the scan repository
//!
//! Both files are rendered from a `README_template.md` next to them. The
//! main template sees:
//!
//! - `staatsexamen`: the exam overview with task trees
//! - `stichwortverzeichnis`: the YAML text of the keyword vocabulary
//! - `aufgaben`: keyword → Markdown list of the tasks tagged with that keyword
//!   or a narrower one, e.g. `{{lookup aufgaben "Master-Theorem"}}`
//!
//! The scan template sees `uebersicht`, the overview without task trees.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use handlebars::Handlebars;
use serde_json::json;
use tracing::debug;

use crate::collection::Registry;
use crate::config::SCANS_REPO_ID;
use crate::error::{AufgabenError, Result};
use crate::generators::{FileChange, exam_overview, raw_link};
use crate::keywords::KEYWORD_FILE;
use crate::paths::RepoLayout;
use crate::task::Task;

pub const README_TEMPLATE: &str = "README_template.md";
pub const README: &str = "README.md";

fn render(template_path: &Path, data: &serde_json::Value) -> Result<String> {
    let template = fs::read_to_string(template_path).map_err(|e| AufgabenError::io(template_path, e))?;
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    Ok(handlebars.render_template(&template, data)?)
}

/// `[Aufgabe 1 „Kleintierverein“](…pdf) (SQL) ([.tex](…tex))`
pub fn task_link(raw_url: &str, layout: &RepoLayout, task: &Task) -> String {
    let data = task.data();
    let title = match task {
        Task::Exam(exam_task) => exam_task.short_title(),
        Task::Plain(data) => data.title_with_topic(),
    };
    format!(
        "{}{} ({})",
        raw_link(raw_url, layout, &title, data.path(), true),
        data.formatted_keywords(),
        raw_link(raw_url, layout, ".tex", data.path(), false)
    )
}

/// A Markdown task list for every keyword of the vocabulary. Empty without
/// a vocabulary.
pub fn keyword_task_lists(registry: &Registry) -> Result<BTreeMap<String, String>> {
    let Some(tree) = registry.keywords() else {
        return Ok(BTreeMap::new());
    };
    let raw_url = registry.config().main_raw_url()?;
    let index = registry.keyword_index();
    Ok(tree
        .keywords()
        .map(|keyword| {
            let list = index
                .tasks_in_subtree(tree, keyword)
                .into_iter()
                .map(|task| format!("- {}", task_link(&raw_url, registry.layout(), task)))
                .collect::<Vec<_>>()
                .join("\n");
            (keyword.to_string(), list)
        })
        .collect())
}

/// `README.md` of the task repository
pub fn main_readme(registry: &Registry) -> Result<FileChange> {
    let layout = registry.layout();
    let vocabulary_path = layout.join([KEYWORD_FILE]);
    let vocabulary = if vocabulary_path.exists() {
        fs::read_to_string(&vocabulary_path).map_err(|e| AufgabenError::io(&vocabulary_path, e))?
    } else {
        String::new()
    };
    let data = json!({
        "staatsexamen": exam_overview(registry, true)?,
        "stichwortverzeichnis": vocabulary,
        "aufgaben": keyword_task_lists(registry)?,
    });
    let content = render(&layout.join([README_TEMPLATE]), &data)?;
    Ok(FileChange::Write { path: layout.join([README]), content })
}

/// `README.md` of the scan repository, `None` without a configured scan repository
pub fn scans_readme(registry: &Registry) -> Result<Option<FileChange>> {
    let config = registry.config();
    if !config.repos.contains_key(SCANS_REPO_ID) {
        debug!("No scan repository configured, skipping its README");
        return Ok(None);
    }
    let layout = RepoLayout::new(config.scans_root()?);
    let data = json!({ "uebersicht": exam_overview(registry, false)? });
    let content = render(&layout.join([README_TEMPLATE]), &data)?;
    Ok(Some(FileChange::Write { path: layout.join([README]), content }))
}
