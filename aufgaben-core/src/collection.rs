//! Repository-wide indexes of exams and tasks
//!
//! The [`Registry`] is built once per invocation:
//!
//! 1. scan the scan repository for `Scan.pdf` markers, one [`Exam`] each
//! 2. scan the main repository for task files
//! 3. register every exam task with its exam
//!
//! Nothing is cached beyond the registry itself. A fresh process scans again.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::Glob;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::exam::{Exam, ExamReference, SCAN_FILE};
use crate::keywords::{KEYWORD_FILE, KeywordIndex, KeywordTree};
use crate::paths::{self, RepoLayout};
use crate::status::StatusIssue;
use crate::task::Task;
use crate::tree::{ExamTaskVisitor, OutputCollector};

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// All files below `root`, skipping hidden files and directories
fn walk_files(root: &Path) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter(|e| e.as_ref().map_or(true, |e| e.file_type().is_file()))
}

/// Files below `root` whose path relative to `root` matches the glob
/// `pattern`, e.g. `**/*.tex`. Hidden entries are skipped.
pub fn find_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)?.compile_matcher();
    let mut files = Vec::new();
    for entry in walk_files(root) {
        let entry = entry?;
        let matches = entry.path().strip_prefix(root).is_ok_and(|relative| matcher.is_match(relative));
        if matches {
            files.push(entry.into_path());
        }
    }
    debug!(pattern, count = files.len(), root = %root.display(), "Matched files");
    Ok(files)
}

/// Callbacks of a traversal over all exams. The task level callbacks of
/// [`ExamTaskVisitor`] fire when [`ExamVisitor::descend_into_tasks`] is true.
pub trait ExamVisitor: ExamTaskVisitor {
    fn enter_exam_number(&mut self, _number: u32) -> Option<String> {
        None
    }

    fn enter_year(&mut self, _year: u32, _number: u32) -> Option<String> {
        None
    }

    fn enter_exam(&mut self, _exam: &Exam) -> Option<String> {
        None
    }

    /// Called after all exams of the number were visited
    fn leave_exam_number(&mut self, _number: u32) -> Option<String> {
        None
    }

    fn descend_into_tasks(&self) -> bool {
        false
    }
}

/// Exam number → year → month → exam
pub type ExamTree<'a> = BTreeMap<u32, BTreeMap<u32, BTreeMap<u32, &'a Exam>>>;

#[derive(Debug, Clone, Default)]
pub struct ExamCollection {
    exams: BTreeMap<ExamReference, Exam>,
}

impl ExamCollection {
    /// Every `Scan.pdf` below `root` makes an exam. A marker outside a
    /// `<nummer>/<jahr>/<monat>/` directory is an error.
    pub fn scan(root: &Path) -> Result<Self> {
        let mut collection = Self::default();
        for entry in walk_files(root) {
            let entry = entry?;
            if entry.file_name() != SCAN_FILE {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let exam = Exam::from_path(&relative.to_string_lossy())?;
            debug!(exam = %exam.reference(), "Found exam");
            collection.insert(exam);
        }
        info!(count = collection.len(), root = %root.display(), "Scanned exams");
        Ok(collection)
    }

    pub fn from_exams(exams: impl IntoIterator<Item = Exam>) -> Self {
        let mut collection = Self::default();
        for exam in exams {
            collection.insert(exam);
        }
        collection
    }

    pub fn insert(&mut self, exam: Exam) {
        self.exams.insert(exam.reference(), exam);
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    /// All exams ordered by number, year and month
    pub fn iter(&self) -> impl Iterator<Item = &Exam> {
        self.exams.values()
    }

    pub fn get(&self, number: u32, year: u32, month: u32) -> Option<&Exam> {
        self.exams.get(&ExamReference { number, year, month })
    }

    /// `66116:2020:09`
    pub fn by_reference(&self, reference: &str) -> Result<Option<&Exam>> {
        Ok(self.exams.get(&ExamReference::parse(reference)?))
    }

    /// The exam whose directory contains `path`
    pub fn by_path(&self, path: &str) -> Result<Option<&Exam>> {
        Ok(self.exams.get(&paths::extract_exam_reference_from_path(path)?))
    }

    /// Existing exam or a new one for the reference
    fn entry(&mut self, reference: ExamReference) -> Result<&mut Exam> {
        match self.exams.entry(reference) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!(exam = %reference, "Creating exam without scan");
                Ok(entry.insert(Exam::from_reference(reference)?))
            }
        }
    }

    pub fn tree(&self) -> ExamTree<'_> {
        let mut tree = ExamTree::new();
        for (reference, exam) in &self.exams {
            tree.entry(reference.number)
                .or_default()
                .entry(reference.year)
                .or_default()
                .insert(reference.month, exam);
        }
        tree
    }

    /// Walk all exams in tree order, descending into the task trees when the
    /// visitor asks for it. `None` if no callback returned text.
    pub fn visit<V: ExamVisitor + ?Sized>(&self, visitor: &mut V) -> Result<Option<String>> {
        let mut output = OutputCollector::default();
        for (number, years) in self.tree() {
            output.collect(visitor.enter_exam_number(number));
            for (year, months) in years {
                output.collect(visitor.enter_year(year, number));
                for exam in months.values() {
                    output.collect(visitor.enter_exam(exam));
                    if visitor.descend_into_tasks() {
                        if let Some(tree) = exam.task_tree() {
                            output.collect(tree.visit(visitor)?);
                        }
                    }
                }
            }
            output.collect(visitor.leave_exam_number(number));
        }
        Ok(output.into_text())
    }
}

/// All tasks by relative path
#[derive(Debug, Clone, Default)]
pub struct TaskCollection {
    tasks: BTreeMap<String, Task>,
}

impl TaskCollection {
    /// Load every task file below the repository root, ignoring other files
    pub fn scan(layout: &RepoLayout) -> Result<Self> {
        let mut collection = Self::default();
        for entry in walk_files(layout.root()) {
            let entry = entry?;
            if entry.path().extension().and_then(OsStr::to_str) != Some("tex") {
                continue;
            }
            if let Some(task) = Task::load(layout, entry.path())? {
                collection.insert(task);
            }
        }
        info!(count = collection.len(), root = %layout.root().display(), "Scanned tasks");
        Ok(collection)
    }

    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut collection = Self::default();
        for task in tasks {
            collection.insert(task);
        }
        collection
    }

    pub fn insert(&mut self, task: Task) {
        self.tasks.insert(task.relative_path().to_string(), task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ordered by relative path
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Look up by the path relative to the repository root
    pub fn get(&self, relative_path: &str) -> Option<&Task> {
        self.tasks.get(relative_path)
    }
}

/// Configuration, exams, tasks and keyword vocabulary of one invocation
#[derive(Debug, Clone)]
pub struct Registry {
    config: Config,
    layout: RepoLayout,
    exams: ExamCollection,
    tasks: TaskCollection,
    keywords: Option<KeywordTree>,
}

impl Registry {
    /// Scan the configured repositories. Keywords are only checked when the
    /// repository has a `Stichwortverzeichnis.yml`.
    pub fn load(config: Config) -> Result<Self> {
        let layout = config.layout()?;
        let exams = ExamCollection::scan(&config.scans_root()?)?;
        let tasks = TaskCollection::scan(&layout)?;
        let vocabulary = layout.join([KEYWORD_FILE]);
        let keywords = if vocabulary.exists() {
            Some(KeywordTree::load(&vocabulary)?)
        } else {
            debug!(path = %vocabulary.display(), "No keyword vocabulary");
            None
        };

        let mut registry = Self::from_parts(config, exams, tasks)?;
        registry.keywords = keywords;
        for (task, issue) in registry.status_issues() {
            warn!(path = %task.relative_path(), "{issue}");
        }
        Ok(registry)
    }

    /// Register the exam tasks with their exams. Exams missing from
    /// `exams` are created.
    pub fn from_parts(config: Config, mut exams: ExamCollection, tasks: TaskCollection) -> Result<Self> {
        let layout = config.layout()?;
        for task in tasks.iter() {
            if let Some(exam_task) = task.as_exam() {
                exams
                    .entry(exam_task.exam_reference())?
                    .register_task(task.relative_path().to_string(), Arc::clone(exam_task));
            }
        }
        Ok(Self { config, layout, exams, tasks, keywords: None })
    }

    pub fn with_keywords(mut self, keywords: KeywordTree) -> Self {
        self.keywords = Some(keywords);
        self
    }

    pub fn keywords(&self) -> Option<&KeywordTree> {
        self.keywords.as_ref()
    }

    pub fn keyword_index(&self) -> KeywordIndex<'_> {
        KeywordIndex::build(&self.tasks)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    pub fn exams(&self) -> &ExamCollection {
        &self.exams
    }

    pub fn tasks(&self) -> &TaskCollection {
        &self.tasks
    }

    /// A task by absolute or repository-relative path
    pub fn task(&self, path: impl AsRef<Path>) -> Option<&Task> {
        let relative = self.layout.relative(self.layout.normalize(path));
        self.tasks.get(&relative)
    }

    /// An exam by reference (`66116:2020:09`) or by a path inside its directory
    pub fn exam(&self, reference_or_path: &str) -> Result<Option<&Exam>> {
        if reference_or_path.contains('/') {
            self.exams.by_path(reference_or_path)
        } else {
            self.exams.by_reference(reference_or_path)
        }
    }

    /// Every status value outside its scale and every keyword missing from
    /// the vocabulary, by task
    pub fn status_issues(&self) -> Vec<(&Task, StatusIssue)> {
        let mut issues = Vec::new();
        for task in self.tasks.iter() {
            let data = task.data();
            issues.extend(data.status_issues().into_iter().map(|issue| (task, issue)));
            if let Some(keywords) = &self.keywords {
                issues.extend(keywords.check(data.keywords()).into_iter().map(|issue| (task, issue)));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{ExamTask, TaskData};
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "Examen/66116/2020/09/Scan.pdf", "");
        write(root, "Examen/66116/2021/03/Scan.pdf", "");
        write(root, "Examen/46116/2015/03/Scan.pdf", "");
        write(
            root,
            "Examen/66116/2020/09/Thema-1/Teilaufgabe-1/Aufgabe-1.tex",
            "\\bAufgabenMetadaten{\n  Titel = {Aufgabe 1},\n  BearbeitungsStand = mit Lösung,\n}\n",
        );
        write(root, "Examen/66116/2020/09/Thema-1/Teilaufgabe-1/Aufgabe-2.tex", "");
        write(root, "Examen/66116/2021/03/Aufgabe-1.tex", "");
        write(root, "Examen/46115/2019/09/Aufgabe-3.tex", "");
        write(
            root,
            "Module/30_AUD/Aufgabe_Master-Theorem.tex",
            "\\bAufgabenMetadaten{\n  Titel = {Master-Theorem},\n  Korrektheit = vielleicht,\n}\n",
        );
        write(root, "Module/30_AUD/Notizen.tex", "");
        write(root, ".versteckt/Aufgabe_Geheim.tex", "");
        dir
    }

    #[test]
    fn test_scan_exams() {
        let dir = fixture();
        let exams = ExamCollection::scan(dir.path()).unwrap();
        assert_eq!(exams.len(), 3);
        assert!(exams.get(66116, 2020, 9).is_some());
        assert!(exams.by_reference("46116:2015:03").unwrap().is_some());
        assert!(exams.by_reference("46116:2016:03").unwrap().is_none());
        assert!(exams.by_path("Examen/66116/2021/03/Thema-1/Aufgabe-1.tex").unwrap().is_some());
        assert!(exams.by_reference("46116").is_err());
    }

    #[test]
    fn test_scan_rejects_invalid_month() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Examen/66116/2020/10/Scan.pdf", "");
        assert!(ExamCollection::scan(dir.path()).is_err());
    }

    #[test]
    fn test_exam_tree_is_sorted() {
        let dir = fixture();
        let exams = ExamCollection::scan(dir.path()).unwrap();
        let tree = exams.tree();
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![46116, 66116]);
        assert_eq!(tree[&66116].keys().copied().collect::<Vec<_>>(), vec![2020, 2021]);
        assert_eq!(tree[&66116][&2020][&9].reference_string(), "66116:2020:09");
    }

    #[test]
    fn test_scan_tasks() {
        let dir = fixture();
        let layout = RepoLayout::new(dir.path());
        let tasks = TaskCollection::scan(&layout).unwrap();
        assert_eq!(tasks.len(), 5);
        assert!(tasks.get("Module/30_AUD/Aufgabe_Master-Theorem.tex").is_some());
        assert!(tasks.get("Module/30_AUD/Notizen.tex").is_none());
        assert!(tasks.get(".versteckt/Aufgabe_Geheim.tex").is_none());
        assert!(tasks.get("Examen/66116/2021/03/Aufgabe-1.tex").unwrap().is_exam());
    }

    #[test]
    fn test_registry_registers_exam_tasks() {
        let dir = fixture();
        let registry = Registry::load(Config::for_root(dir.path())).unwrap();

        let exam = registry.exam("66116:2020:09").unwrap().unwrap();
        assert_eq!(exam.tasks().len(), 2);
        assert!(exam.has_tasks());
        assert_eq!(exam.task_tree().unwrap().leaf_count(), 2);

        // a single task: registered, but no tree
        let exam = registry.exam("66116:2021:03").unwrap().unwrap();
        assert_eq!(exam.tasks().len(), 1);
        assert!(exam.task_tree().is_none());

        // no scan, created on registration
        let exam = registry.exam("Examen/46115/2019/09/Aufgabe-3.tex").unwrap().unwrap();
        assert_eq!(exam.tasks().len(), 1);
        assert_eq!(registry.exams().len(), 4);

        let task = registry.task(dir.path().join("Examen/66116/2020/09/Thema-1/Teilaufgabe-1/Aufgabe-1.tex"));
        assert_eq!(task.unwrap().data().processing_rank(), Some(4));
        assert!(registry.task("Module/30_AUD/Aufgabe_Master-Theorem.tex").is_some());
    }

    #[test]
    fn test_status_issues() {
        let dir = fixture();
        let registry = Registry::load(Config::for_root(dir.path())).unwrap();
        let issues = registry.status_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0.relative_path(), "Module/30_AUD/Aufgabe_Master-Theorem.tex");
        assert_eq!(issues[0].1.value, "vielleicht");
    }

    #[test]
    fn test_registry_from_parts() {
        let layout = RepoLayout::new("/repo");
        let tasks = ["Examen/66116/2020/09/Aufgabe-1.tex", "Examen/66116/2020/09/Aufgabe-2.tex"]
            .into_iter()
            .map(|path| {
                let data = TaskData::from_content(&layout, path, "");
                Task::Exam(Arc::new(ExamTask::from_data(data).unwrap()))
            });
        let registry = Registry::from_parts(
            Config::for_root("/repo"),
            ExamCollection::default(),
            TaskCollection::from_tasks(tasks),
        )
        .unwrap();
        assert_eq!(registry.exams().len(), 1);
        assert!(registry.exams().get(66116, 2020, 9).unwrap().has_tasks());
    }

    #[test]
    fn test_classification_ignores_checkout_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Aufgabe_Sammlung");
        write(&root, "Module/Notizen.tex", "");
        write(&root, "Module/Aufgabe_Rekursion.tex", "");
        let tasks = TaskCollection::scan(&RepoLayout::new(&root)).unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks.get("Module/Notizen.tex").is_none());

        let root = dir.path().join("66116/2020/09");
        write(&root, "Aufgabe-1.tex", "");
        assert!(TaskCollection::scan(&RepoLayout::new(&root)).unwrap().is_empty());
    }

    #[test]
    fn test_exam_lookup_with_unpadded_month() {
        let dir = fixture();
        let registry = Registry::load(Config::for_root(dir.path())).unwrap();
        let exam = registry.exam("66116:2020:9").unwrap().unwrap();
        assert_eq!(exam.reference_string(), "66116:2020:09");
        assert!(registry.exam("66116:2020").is_err());
    }

    #[test]
    fn test_unknown_keywords_are_reported() {
        let dir = fixture();
        write(dir.path(), KEYWORD_FILE, "- Algorithmen:\n  - Master-Theorem\n- SQL\n");
        write(dir.path(), "Module/30_AUD/Aufgabe_Rekursion.tex", "\\index{Master-Theorem}\\index{Mastertheorem}\n");
        let registry = Registry::load(Config::for_root(dir.path())).unwrap();
        assert_eq!(registry.keywords().unwrap().len(), 3);

        let issues: Vec<_> = registry
            .status_issues()
            .into_iter()
            .filter(|(_, issue)| issue.field == crate::status::StatusField::Keyword)
            .collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0.relative_path(), "Module/30_AUD/Aufgabe_Rekursion.tex");
        assert_eq!(issues[0].1, StatusIssue::unknown_keyword("Mastertheorem", Some("Master-Theorem".to_string())));

        let index = registry.keyword_index();
        assert_eq!(index.tasks_in_subtree(registry.keywords().unwrap(), "Algorithmen").len(), 1);
    }

    #[test]
    fn test_duplicate_vocabulary_entry_fails_loading() {
        let dir = fixture();
        write(dir.path(), KEYWORD_FILE, "- SQL\n- SQL\n");
        assert!(Registry::load(Config::for_root(dir.path())).is_err());
    }

    #[test]
    fn test_find_files_by_glob() {
        let dir = fixture();
        let relative = |files: Vec<PathBuf>| {
            files
                .iter()
                .map(|f| f.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            relative(find_files(dir.path(), "Module/**/*.tex").unwrap()),
            vec!["Module/30_AUD/Aufgabe_Master-Theorem.tex", "Module/30_AUD/Notizen.tex"]
        );
        assert_eq!(find_files(dir.path(), "**/*.tex").unwrap().len(), 6);
        assert!(find_files(dir.path(), "**/*.{tex").is_err());
    }

    struct Listing;

    impl ExamTaskVisitor for Listing {
        fn enter_task(
            &mut self,
            task: &ExamTask,
            _number: u32,
            _subtask: Option<u32>,
            _topic: Option<u32>,
        ) -> Option<String> {
            Some(format!("    {}", task.task_reference()))
        }
    }

    impl ExamVisitor for Listing {
        fn enter_exam_number(&mut self, number: u32) -> Option<String> {
            Some(format!("{number}"))
        }

        fn enter_exam(&mut self, exam: &Exam) -> Option<String> {
            Some(format!("  {}", exam.year_season()))
        }

        fn leave_exam_number(&mut self, number: u32) -> Option<String> {
            Some(format!("/{number}"))
        }

        fn descend_into_tasks(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_visit_all_exams() {
        let dir = fixture();
        let registry = Registry::load(Config::for_root(dir.path())).unwrap();
        let output = registry.exams().visit(&mut Listing).unwrap().unwrap();
        assert_eq!(
            output,
            [
                "46115",
                "  2019 Herbst",
                "/46115",
                "46116",
                "  2015 Frühjahr",
                "/46116",
                "66116",
                "  2020 Herbst",
                "    T1 TA1 A1",
                "    T1 TA1 A2",
                "  2021 Frühjahr",
                "/66116",
            ]
            .join("\n")
        );
    }
}
