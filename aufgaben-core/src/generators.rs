//! Documents generated from the registry
//!
//! Generators are pure: they return [`FileChange`]s or text and never touch
//! the filesystem. The command line applies the changes.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex_utils::tex;
use tracing::{debug, info};

use crate::collection::{ExamVisitor, Registry};
use crate::config::Config;
use crate::error::{AufgabenError, Result};
use crate::exam::{EXAM_ROOT_DIR, Exam, OCR_FILE, SCAN_FILE};
use crate::metadata::{self, BRACED_KEYS, METADATA_MACRO, Metadata};
use crate::paths::{RepoLayout, TaskKind};
use crate::task::{ExamTask, Task};
use crate::tree::{ExamTaskVisitor, OutputCollector};

/// Name of the per-exam solution document
pub const EXAM_DOCUMENT: &str = "Examen.tex";

/// Name of the per-number scan collection
pub const SCAN_COLLECTION_DOCUMENT: &str = "Examensammlung.tex";

/// A change to a file in the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// Create or replace the file
    Write { path: PathBuf, content: String },
    /// Create the file unless it exists
    Create { path: PathBuf, content: String },
    Remove { path: PathBuf },
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            Self::Write { path, .. } | Self::Create { path, .. } | Self::Remove { path } => path,
        }
    }

    /// Returns whether the filesystem changed. Removing a missing file is a no-op.
    pub fn apply(&self) -> Result<bool> {
        match self {
            Self::Create { path, .. } if path.exists() => {
                debug!(path = %path.display(), "File exists, not overwriting");
                Ok(false)
            }
            Self::Write { path, content } | Self::Create { path, content } => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| AufgabenError::io(parent, e))?;
                }
                fs::write(path, content).map_err(|e| AufgabenError::io(path, e))?;
                info!(path = %path.display(), "Wrote file");
                Ok(true)
            }
            Self::Remove { path } => match fs::remove_file(path) {
                Ok(()) => {
                    info!(path = %path.display(), "Removed file");
                    Ok(true)
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(AufgabenError::io(path, e)),
            },
        }
    }
}

/// ```latex
/// \documentclass{bschlangaul-<class>}
/// <head>
/// \begin{document}
/// <body>
/// \end{document}
/// ```
pub fn tex_document(class: &str, head: &str, body: &str) -> String {
    format!(
        "\\documentclass{{bschlangaul-{class}}}\n{head}\n\\begin{{document}}\n{}\n\\end{{document}}\n",
        body.trim()
    )
}

pub fn markdown_link(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

/// Link to a file of the main repository on the hosting service. With
/// `link_pdf` the link points to the compiled PDF instead.
pub(crate) fn raw_link(raw_url: &str, layout: &RepoLayout, text: &str, path: &Path, link_pdf: bool) -> String {
    let path = if link_pdf { path.with_extension("pdf") } else { path.to_path_buf() };
    markdown_link(text, &format!("{raw_url}/{}", layout.relative(path)))
}

/// The metadata block of a task as it would be written into the file
pub fn metadata_block(task: &Task) -> String {
    metadata::render_plist(METADATA_MACRO, &task.metadata(), &BRACED_KEYS)
}

/// Rewrite the metadata block of a task. `None` if the file is up to date.
pub fn update_metadata(task: &Task) -> Option<FileChange> {
    let content = metadata::replace_metadata_block(task.data().content(), &metadata_block(task))?;
    Some(FileChange::Write { path: task.path().to_path_buf(), content })
}

struct SolutionBody;

impl ExamTaskVisitor for SolutionBody {
    fn enter_topic(&mut self, topic: u32, _exam: &Exam) -> Option<String> {
        Some(format!("\n\n\\liSetzeExamenThemaNr{{{topic}}}"))
    }

    fn enter_subtask(&mut self, subtask: u32, _topic: u32, _exam: &Exam) -> Option<String> {
        Some(format!("\n\\liSetzeExamenTeilaufgabeNr{{{subtask}}}\n"))
    }

    fn enter_task(
        &mut self,
        _task: &ExamTask,
        number: u32,
        _subtask: Option<u32>,
        _topic: Option<u32>,
    ) -> Option<String> {
        Some(format!("\\liBindeAufgabeEin{{{number}}}"))
    }
}

/// `Examen.tex` embedding all tasks of the exam. An exam without a task tree
/// gets its stale document removed.
pub fn exam_solution(exam: &Exam, config: &Config, layout: &RepoLayout) -> Result<FileChange> {
    let path = exam.make_path(layout, [EXAM_DOCUMENT]);
    let body = match exam.task_tree() {
        Some(tree) => tree.visit(&mut SolutionBody)?,
        None => None,
    };
    let Some(body) = body else {
        debug!(exam = %exam.reference(), "Exam has no tasks");
        return Ok(FileChange::Remove { path });
    };

    let mut head = Metadata::new();
    head.insert("ExamenNummer", exam.number().to_string());
    head.insert("ExamenFach", exam.subject(config).unwrap_or_default());
    head.insert("ExamenJahr", exam.year().to_string());
    head.insert("ExamenMonat", exam.month_padded());
    head.insert("ExamenJahreszeit", exam.season().name());
    let head = metadata::render_plist("liMetaSetze", &head, &[]);

    Ok(FileChange::Write { path, content: tex_document("examen", &head, &body) })
}

pub fn exam_solutions(registry: &Registry) -> Result<Vec<FileChange>> {
    registry
        .exams()
        .iter()
        .map(|exam| exam_solution(exam, registry.config(), registry.layout()))
        .collect()
}

/// Indented topic / sub-task / task list with links to the compiled tasks
struct TaskOutline<'r> {
    raw_url: &'r str,
    layout: &'r RepoLayout,
}

fn indent(level: usize) -> String {
    format!("{}- ", " ".repeat(4 * level))
}

impl ExamTaskVisitor for TaskOutline<'_> {
    fn enter_topic(&mut self, topic: u32, _exam: &Exam) -> Option<String> {
        Some(format!("{}Thema {topic}", indent(1)))
    }

    fn enter_subtask(&mut self, subtask: u32, _topic: u32, _exam: &Exam) -> Option<String> {
        Some(format!("{}Teilaufgabe {subtask}", indent(2)))
    }

    fn enter_task(
        &mut self,
        task: &ExamTask,
        _number: u32,
        subtask: Option<u32>,
        topic: Option<u32>,
    ) -> Option<String> {
        let level = 1 + usize::from(topic.is_some()) + usize::from(subtask.is_some());
        let path = task.data().path();
        Some(format!(
            "{}{} ({})",
            indent(level),
            raw_link(self.raw_url, self.layout, &task.task_only_title(), path, true),
            raw_link(self.raw_url, self.layout, ".tex", path, false)
        ))
    }
}

/// Markdown overview of all exams for the README
///
/// ```md
/// ### 46116: Softwaretechnologie / Datenbanksysteme
///
/// - 2015 Frühjahr: [Scan.pdf](…/46116/2015/03/Scan.pdf) [OCR.txt](…/46116/2015/03/OCR.txt)
///     - Thema 1
///         - Teilaufgabe 1
///             - [Aufgabe 3](…/Thema-1/Teilaufgabe-1/Aufgabe-3.pdf) ([.tex](…/Aufgabe-3.tex))
/// ```
///
/// Without `include_tasks` only the scan and OCR links are listed.
pub fn exam_overview(registry: &Registry, include_tasks: bool) -> Result<String> {
    let config = registry.config();
    let raw_url = config.main_raw_url()?;
    let mut outline = TaskOutline { raw_url: &raw_url, layout: registry.layout() };
    let mut output = OutputCollector::default();

    for (number, years) in registry.exams().tree() {
        let heading = match config.subject(number) {
            Some(subject) => format!("\n### {number}: {subject}\n"),
            None => format!("\n### {number}\n"),
        };
        output.collect(Some(heading));

        for exam in years.values().flat_map(|months| months.values()) {
            let mut line = format!(
                "- {}: {} {}",
                exam.year_season(),
                markdown_link(SCAN_FILE, &exam.scan_url(config)?),
                markdown_link(OCR_FILE, &exam.ocr_url(config)?)
            );
            let tree = if include_tasks { exam.task_tree() } else { None };
            if let Some(tree) = tree {
                if let Some(tasks) = tree.visit(&mut outline)? {
                    line.push('\n');
                    line.push_str(&tasks);
                }
            }
            output.collect(Some(line));
        }
    }
    Ok(output.into_text().unwrap_or_default())
}

/// One document per exam number concatenating all scans
struct ScanCollection<'r> {
    config: &'r Config,
    layout: &'r RepoLayout,
    body: OutputCollector,
    files: Vec<FileChange>,
}

impl ExamTaskVisitor for ScanCollection<'_> {}

impl ExamVisitor for ScanCollection<'_> {
    fn enter_exam_number(&mut self, _number: u32) -> Option<String> {
        self.body = OutputCollector::default();
        None
    }

    fn enter_exam(&mut self, exam: &Exam) -> Option<String> {
        self.body.collect(Some(format!("\n\\liTrennSeite{{{} {}}}", exam.season(), exam.year())));
        self.body.collect(Some(format!(
            "\\liBindePdfEin{{{}/{SCAN_FILE}}}",
            exam.relative_directory()
        )));
        None
    }

    fn leave_exam_number(&mut self, number: u32) -> Option<String> {
        let body = std::mem::take(&mut self.body).into_text().unwrap_or_default();
        let head = format!(
            "\\liPruefungsNummer{{{number}}}\n\\liPruefungsTitel{{{}}}\n",
            self.config.subject(number).unwrap_or_default()
        );
        self.files.push(FileChange::Write {
            path: self.layout.join([EXAM_ROOT_DIR, &number.to_string(), SCAN_COLLECTION_DOCUMENT]),
            content: tex_document("examen-scans", &head, &body),
        });
        None
    }
}

/// `Examen/<nummer>/Examensammlung.tex` for every exam number
pub fn scan_collections(registry: &Registry) -> Result<Vec<FileChange>> {
    let mut collection = ScanCollection {
        config: registry.config(),
        layout: registry.layout(),
        body: OutputCollector::default(),
        files: Vec::new(),
    };
    registry.exams().visit(&mut collection)?;
    Ok(collection.files)
}

/// Which tasks go into a task collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Minimum rank on the processing scale
    pub min_processing: usize,
    /// Minimum rank on the correctness scale
    pub min_correctness: Option<usize>,
    /// Only exam tasks or only plain tasks
    pub kind: Option<TaskKind>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let data = task.data();
        let processing = data.processing_rank().is_some_and(|rank| rank >= self.min_processing);
        let correctness = match self.min_correctness {
            Some(min) => data.correctness_rank().is_some_and(|rank| rank >= min),
            None => true,
        };
        let kind = self.kind.is_none_or(|kind| kind == task.kind());
        processing && correctness && kind
    }
}

/// Embed macros of the matching tasks, sorted by path, each task at most once
pub fn task_collection(registry: &Registry, filter: &TaskFilter) -> String {
    let mut tasks: Vec<&Task> = registry.tasks().iter().filter(|task| filter.matches(task)).collect();
    tasks.sort_by(|a, b| Task::compare_by_path(a, b));

    let mut embedded = HashSet::new();
    let lines: Vec<String> = tasks
        .into_iter()
        .filter(|task| embedded.insert(task.relative_path().to_string()))
        .map(Task::embed_macro)
        .collect();
    info!(count = lines.len(), "Collected tasks");
    lines.join("\n")
}

pub fn task_collection_document(registry: &Registry, filter: &TaskFilter, target: PathBuf) -> FileChange {
    FileChange::Write { path: target, content: tex_document("sammlung", "", &task_collection(registry, filter)) }
}

/// Skeleton of a new task file
pub fn task_template(title: &str, topic: &str, citation_key: &str) -> String {
    let mut meta = Metadata::new();
    meta.insert("Titel", title);
    meta.insert("Thematik", topic);
    meta.insert("ZitatSchluessel", citation_key);
    let block = metadata::render_plist(METADATA_MACRO, &meta, &BRACED_KEYS);
    tex_document("aufgabe", "", &format!("{block}\n\\index{{}}\n\\footcite{{{citation_key}}}\n"))
}

/// `Aufgabe_Mein-Titel.tex` in `directory`, or `Aufgabe_.tex` without a title
pub fn plain_task_path(directory: &Path, title: Option<&str>) -> PathBuf {
    let name = title.map(|t| tex::WHITESPACE_RUN.replace_all(t.trim(), "-").into_owned()).unwrap_or_default();
    directory.join(format!("Aufgabe_{name}.tex"))
}

/// A new plain task file. An existing file is left alone.
pub fn scaffold_task(directory: &Path, title: Option<&str>) -> FileChange {
    FileChange::Create {
        path: plain_task_path(directory, title),
        content: task_template(title.unwrap_or_default(), "", ""),
    }
}

/// A new exam task file from a reference such as `66116:2021:03` and the
/// positional numbers of [`ExamTask::create`]. An existing file is left alone.
pub fn scaffold_exam_task(
    layout: &RepoLayout,
    reference: &str,
    first: u32,
    second: Option<u32>,
    third: Option<u32>,
) -> Result<FileChange> {
    let task = ExamTask::create(layout, reference, first, second, third)?;
    Ok(FileChange::Create {
        path: task.data().path().to_path_buf(),
        content: task_template(
            &task.formatted_number(),
            "",
            &format!("examen:{}", task.exam_reference()),
        ),
    })
}
