//! Task entities
//!
//! A [`Task`] is either a plain task (`Aufgabe_*.tex`) or an exam task
//! (`Examen/<nummer>/<jahr>/<monat>/.../Aufgabe-N.tex`). Both share the data
//! read from the file; the exam variant adds the numbers encoded in its path.

use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex_utils::task_path;
use tracing::debug;

use crate::error::{AufgabenError, Result};
use crate::exam::{EXAM_ROOT_DIR, Exam, ExamReference, Season};
use crate::metadata::{
    self, Citation, FALLBACK_TITLE, FALLBACK_TOPIC, Metadata, TOPIC_MACRO, UNKNOWN,
};
use crate::paths::{self, RepoLayout, TaskKind};
use crate::status::{Correctness, ProcessingStatus, StatusField, StatusIssue};

/// Everything read from a task file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskData {
    /// Absolute path, the identity of the task
    path: PathBuf,

    /// e.g. `Examen/66116/2020/09/Thema-1/Aufgabe-1.tex`
    relative_path: String,

    /// TeX markup, empty if the file does not exist yet
    content: String,

    keywords: Vec<String>,
    metadata: Option<Metadata>,
    processing: ProcessingStatus,
    correctness: Correctness,
}

impl TaskData {
    /// Read a task file. A missing file yields a task with empty content so
    /// tasks can be referenced before they are written.
    pub fn load(layout: &RepoLayout, path: impl AsRef<Path>) -> Result<Self> {
        let path = layout.normalize(path);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(AufgabenError::io(&path, e)),
        };
        Ok(Self::from_content(layout, path, content))
    }

    pub fn from_content(layout: &RepoLayout, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        let path = layout.normalize(path);
        let content = content.into();
        let metadata = metadata::parse_metadata_block(&content);
        let processing = metadata
            .as_ref()
            .and_then(|m| m.get(StatusField::Processing.key()))
            .map(ProcessingStatus::parse)
            .unwrap_or_default();
        let correctness = metadata
            .as_ref()
            .and_then(|m| m.get(StatusField::Correctness.key()))
            .map(Correctness::parse)
            .unwrap_or_default();

        Self {
            relative_path: layout.relative(&path),
            keywords: metadata::extract_keywords(&content),
            path,
            content,
            metadata,
            processing,
            correctness,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// The parsed `\bAufgabenMetadaten` block, if the file has one
    pub fn parsed_metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    /// `Titel` of the metadata, else the first `\section`, else `Aufgabe`
    pub fn title(&self) -> String {
        self.metadata_value("Titel")
            .map(str::to_string)
            .or_else(|| metadata::section_title(&self.content))
            .unwrap_or_else(|| FALLBACK_TITLE.to_string())
    }

    /// `Thematik` of the metadata, else `\bAufgabenTitel`, else `keine Thematik`
    pub fn topic(&self) -> String {
        self.metadata_value("Thematik")
            .map(str::to_string)
            .or_else(|| metadata::first_macro_argument(TOPIC_MACRO, &self.content))
            .unwrap_or_else(|| FALLBACK_TOPIC.to_string())
    }

    /// Whether the file names its title, in the metadata or as a `\section`
    pub fn has_title(&self) -> bool {
        self.metadata_value("Titel").is_some() || metadata::section_title(&self.content).is_some()
    }

    pub fn has_topic(&self) -> bool {
        self.topic() != FALLBACK_TOPIC
    }

    pub fn citation(&self) -> Option<Citation> {
        metadata::extract_first_citation(&self.content)
    }

    pub fn processing(&self) -> &ProcessingStatus {
        &self.processing
    }

    pub fn processing_rank(&self) -> Option<usize> {
        self.processing.rank()
    }

    pub fn correctness(&self) -> &Correctness {
        &self.correctness
    }

    pub fn correctness_rank(&self) -> Option<usize> {
        self.correctness.rank()
    }

    pub fn is_correct(&self) -> bool {
        self.correctness.is_correct()
    }

    /// How and by whom the solution was verified
    pub fn verified(&self) -> Option<&str> {
        self.metadata_value("Ueberprueft")
    }

    /// Relative path of an identical task in another exam
    pub fn identical_task(&self) -> Option<&str> {
        self.metadata_value("IdentischeAufgabe")
    }

    /// Status values outside their scale
    pub fn status_issues(&self) -> Vec<StatusIssue> {
        let mut issues = Vec::new();
        if let ProcessingStatus::Invalid(value) = &self.processing {
            issues.push(StatusIssue::invalid(StatusField::Processing, value.clone()));
        }
        if let Correctness::Invalid(value) = &self.correctness {
            issues.push(StatusIssue::invalid(StatusField::Correctness, value.clone()));
        }
        issues
    }

    /// `Module/30_AUD/20_Vollstaendige-Induktion/Aufgabe_Geometrische-Summenformel.tex`
    /// becomes `AUD.Vollstaendige-Induktion.Geometrische-Summenformel`
    pub fn reference(&self) -> String {
        let reference = self
            .relative_path
            .replacen("Module/", "", 1)
            .replacen("Aufgabe_", "", 1)
            .replacen(".tex", "", 1);
        task_path::ORDER_PREFIX.replace_all(&reference, "").replace('/', ".")
    }

    /// `„Master-Theorem“`
    pub fn quoted_title(&self) -> String {
        format!("„{}“", self.title())
    }

    /// `Aufgabe 1 „Kleintierverein“`, or just the title without a topic
    pub fn title_with_topic(&self) -> String {
        if self.has_topic() {
            format!("{} „{}“", self.title(), self.topic())
        } else {
            self.title()
        }
    }

    /// ` (Master-Theorem, Rekursion)` or an empty string
    pub fn formatted_keywords(&self) -> String {
        if self.keywords.is_empty() {
            String::new()
        } else {
            format!(" ({})", self.keywords.join(", "))
        }
    }

    /// `\bAufgabe{Module/30_AUD/Aufgabe_Master-Theorem}`
    pub fn embed_macro(&self) -> String {
        format!("\\bAufgabe{{{}}}", self.relative_path.replacen(".tex", "", 1))
    }

    pub fn compare_by_path(a: &TaskData, b: &TaskData) -> Ordering {
        a.path.cmp(&b.path)
    }

    /// Key order: title, topic, reference, relative path, identical task,
    /// citation key and description, status values, verification, keywords.
    fn base_metadata(&self, reference: String) -> Metadata {
        let mut meta = Metadata::new();
        meta.insert("Titel", self.title());
        meta.insert("Thematik", self.topic());
        meta.insert("Referenz", reference);
        meta.insert("RelativerPfad", self.relative_path.as_str());
        if let Some(identical) = self.identical_task() {
            meta.insert("IdentischeAufgabe", identical);
        }
        if let Some(citation) = self.citation() {
            meta.insert("ZitatSchluessel", citation.key);
            if let Some(description) = citation.description {
                meta.insert("ZitatBeschreibung", description);
            }
        }
        meta.insert(StatusField::Processing.key(), self.processing.as_str());
        meta.insert(StatusField::Correctness.key(), self.correctness.as_str());
        meta.insert("Ueberprueft", self.verified().unwrap_or(UNKNOWN));
        if !self.keywords.is_empty() {
            meta.insert("Stichwoerter", self.keywords.join(", "));
        }
        meta
    }
}

/// A task of an exam, `Examen/66116/2020/09/Thema-1/Teilaufgabe-1/Aufgabe-1.tex`
#[derive(Debug, Clone, PartialEq)]
pub struct ExamTask {
    data: TaskData,
    exam: ExamReference,
    season: Season,
    topic: Option<u32>,
    subtask: Option<u32>,
    number: u32,
}

impl ExamTask {
    pub fn load(layout: &RepoLayout, path: impl AsRef<Path>) -> Result<Self> {
        Self::from_data(TaskData::load(layout, path)?)
    }

    /// Reads the exam, topic, sub-task and task numbers from the path.
    /// Fails if the path does not follow the exam task layout.
    pub fn from_data(data: TaskData) -> Result<Self> {
        let path = data.relative_path.clone();
        let invalid = || AufgabenError::InvalidExamTaskPath { path: path.clone() };
        let caps = task_path::EXAM_TASK.captures(&path).ok_or_else(invalid)?;
        let number = |name: &str| -> Result<Option<u32>> {
            caps.name(name).map(|m| m.as_str().parse().map_err(|_| invalid())).transpose()
        };

        let exam = ExamReference {
            number: number("nummer")?.ok_or_else(invalid)?,
            year: number("jahr")?.ok_or_else(invalid)?,
            month: number("monat")?.ok_or_else(invalid)?,
        };
        let topic = number("thema")?;
        let subtask = number("teilaufgabe")?;
        let task_number = number("aufgabe")?.ok_or_else(invalid)?;
        let season = Season::from_month(exam.month)?;

        Ok(Self { exam, season, topic, subtask, number: task_number, data })
    }

    /// Build an exam task from a reference such as `66116:2021:03` and
    /// positional numbers: three numbers are topic, sub-task and task, two are
    /// topic and task, a single one is the task.
    pub fn create(
        layout: &RepoLayout,
        reference: &str,
        first: u32,
        second: Option<u32>,
        third: Option<u32>,
    ) -> Result<Self> {
        let exam = Exam::parse_reference(reference)?;
        let segments = match (second, third) {
            (Some(subtask), Some(task)) => {
                vec![format!("Thema-{first}"), format!("Teilaufgabe-{subtask}"), format!("Aufgabe-{task}.tex")]
            }
            (Some(task), None) => vec![format!("Thema-{first}"), format!("Aufgabe-{task}.tex")],
            _ => vec![format!("Aufgabe-{first}.tex")],
        };
        Self::load(layout, exam.make_path(layout, segments))
    }

    pub fn data(&self) -> &TaskData {
        &self.data
    }

    pub fn exam_reference(&self) -> ExamReference {
        self.exam
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn topic_number(&self) -> Option<u32> {
        self.topic
    }

    pub fn subtask_number(&self) -> Option<u32> {
        self.subtask
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// `Aufgabe 3`
    pub fn formatted_number(&self) -> String {
        format!("Aufgabe {}", self.number)
    }

    fn reference_parts(&self) -> Vec<String> {
        let mut parts = Vec::with_capacity(3);
        if let Some(topic) = self.topic {
            parts.push(format!("T{topic}"));
        }
        if let Some(subtask) = self.subtask {
            parts.push(format!("TA{subtask}"));
        }
        parts.push(format!("A{}", self.number));
        parts
    }

    /// `T1 TA2 A3`
    pub fn task_reference(&self) -> String {
        self.reference_parts().join(" ")
    }

    /// `T1TA2A3`
    pub fn task_reference_short(&self) -> String {
        self.reference_parts().concat()
    }

    /// `66116-2020-H.T1-TA1-A1`
    pub fn reference(&self) -> String {
        format!(
            "{}-{}-{}.{}",
            self.exam.number,
            self.exam.year,
            self.season.letter(),
            self.reference_parts().join("-")
        )
    }

    /// `„Greedy-Färben von Intervallen“ 66115:2017:09 T1A8`
    pub fn short_title(&self) -> String {
        let title = format!("{} {}", self.exam, self.task_reference_short());
        if self.data.has_topic() { format!("„{}“ {title}", self.data.topic()) } else { title }
    }

    /// `Aufgabe 3 (Master-Theorem)`
    pub fn task_only_title(&self) -> String {
        format!("{}{}", self.formatted_number(), self.data.formatted_keywords())
    }

    /// `Examen-Informatik_66116-2020-Herbst_T1-TA1-A1`
    pub fn file_name(&self) -> String {
        format!(
            "Examen-Informatik_{}-{}-{}_{}",
            self.exam.number,
            self.exam.year,
            self.season,
            self.reference_parts().join("-")
        )
    }

    /// `\bExamensAufgabe{66116/2017/03/Thema-1/Teilaufgabe-1/Aufgabe-2}`
    pub fn embed_macro(&self) -> String {
        let relative = self.data.relative_path();
        let relative = relative
            .strip_prefix("Staatsexamen/")
            .or_else(|| relative.strip_prefix(&format!("{EXAM_ROOT_DIR}/")))
            .unwrap_or(relative);
        format!("\\bExamensAufgabe{{{}}}", relative.replacen(".tex", "", 1))
    }

    /// `\ExamensAufgabeTTA 66116 / 2021 / 3 : Thema 1 Teilaufgabe 1 Aufgabe 1`
    pub fn legacy_embed_macro(&self) -> String {
        let exam = format!("{} / {} / {} :", self.exam.number, self.exam.year, self.exam.month);
        let (suffix, task) = match (self.topic, self.subtask) {
            (Some(topic), Some(subtask)) => {
                ("TTA", format!("Thema {topic} Teilaufgabe {subtask} Aufgabe {}", self.number))
            }
            (Some(topic), None) => ("TA", format!("Thema {topic} Aufgabe {}", self.number)),
            _ => ("A", format!("Aufgabe {}", self.number)),
        };
        format!("\\ExamensAufgabe{suffix} {exam} {task}")
    }

    /// The common metadata plus the numbers of exam and task
    pub fn metadata(&self) -> Metadata {
        let mut meta = self.data.base_metadata(self.reference());
        meta.insert("EinzelpruefungsNr", self.exam.number.to_string());
        meta.insert("Jahr", self.exam.year.to_string());
        meta.insert("Monat", format!("{:02}", self.exam.month));
        if let Some(topic) = self.topic {
            meta.insert("ThemaNr", topic.to_string());
        }
        if let Some(subtask) = self.subtask {
            meta.insert("TeilaufgabeNr", subtask.to_string());
        }
        meta.insert("AufgabeNr", self.number.to_string());
        meta
    }
}

/// A plain task or an exam task
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Plain(TaskData),
    Exam(Arc<ExamTask>),
}

impl Task {
    /// Load a file as the task kind its path below the repository root
    /// denotes, `None` for files that are not tasks. Exam tasks take precedence.
    pub fn load(layout: &RepoLayout, path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = layout.normalize(path);
        let task = match paths::classify(&layout.relative(&path)) {
            Some(TaskKind::Exam) => Self::Exam(Arc::new(ExamTask::load(layout, &path)?)),
            Some(TaskKind::Plain) => Self::Plain(TaskData::load(layout, &path)?),
            None => return Ok(None),
        };
        debug!(path = %task.relative_path(), kind = ?task.kind(), "Loaded task");
        Ok(Some(task))
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Plain(_) => TaskKind::Plain,
            Self::Exam(_) => TaskKind::Exam,
        }
    }

    pub fn is_exam(&self) -> bool {
        matches!(self, Self::Exam(_))
    }

    pub fn as_exam(&self) -> Option<&Arc<ExamTask>> {
        match self {
            Self::Exam(task) => Some(task),
            Self::Plain(_) => None,
        }
    }

    pub fn data(&self) -> &TaskData {
        match self {
            Self::Plain(data) => data,
            Self::Exam(task) => task.data(),
        }
    }

    pub fn path(&self) -> &Path {
        self.data().path()
    }

    pub fn relative_path(&self) -> &str {
        self.data().relative_path()
    }

    pub fn reference(&self) -> String {
        match self {
            Self::Plain(data) => data.reference(),
            Self::Exam(task) => task.reference(),
        }
    }

    pub fn embed_macro(&self) -> String {
        match self {
            Self::Plain(data) => data.embed_macro(),
            Self::Exam(task) => task.embed_macro(),
        }
    }

    pub fn metadata(&self) -> Metadata {
        match self {
            Self::Plain(data) => data.base_metadata(data.reference()),
            Self::Exam(task) => task.metadata(),
        }
    }

    pub fn compare_by_path(a: &Task, b: &Task) -> Ordering {
        TaskData::compare_by_path(a.data(), b.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{BRACED_KEYS, METADATA_MACRO, parse_metadata_block, render_plist};
    use pretty_assertions::assert_eq;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_exam_task_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(dir.path());
        write(
            dir.path(),
            "Examen/66116/2020/09/Thema-1/Teilaufgabe-1/Aufgabe-1.tex",
            "\\bAufgabenMetadaten{\n  Titel = {Aufgabe 1},\n}\n",
        );

        let task =
            ExamTask::load(&layout, "Examen/66116/2020/09/Thema-1/Teilaufgabe-1/Aufgabe-1.tex").unwrap();
        assert_eq!(task.topic_number(), Some(1));
        assert_eq!(task.subtask_number(), Some(1));
        assert_eq!(task.number(), 1);
        assert_eq!(task.data().title(), "Aufgabe 1");
        assert_eq!(task.exam_reference().to_string(), "66116:2020:09");
        assert_eq!(task.reference(), "66116-2020-H.T1-TA1-A1");
        assert_eq!(task.task_reference(), "T1 TA1 A1");
        assert_eq!(task.file_name(), "Examen-Informatik_66116-2020-Herbst_T1-TA1-A1");
        assert_eq!(task.embed_macro(), "\\bExamensAufgabe{66116/2020/09/Thema-1/Teilaufgabe-1/Aufgabe-1}");
        assert_eq!(
            task.legacy_embed_macro(),
            "\\ExamensAufgabeTTA 66116 / 2020 / 9 : Thema 1 Teilaufgabe 1 Aufgabe 1"
        );
    }

    #[test]
    fn test_create_from_reference() {
        let layout = RepoLayout::new("/repo");
        let task = ExamTask::create(&layout, "66116:2020:09", 1, Some(2), Some(3)).unwrap();
        assert_eq!(
            task.data().path(),
            Path::new("/repo/Examen/66116/2020/09/Thema-1/Teilaufgabe-2/Aufgabe-3.tex")
        );
        assert_eq!(task.task_reference_short(), "T1TA2A3");
        // the file does not exist yet
        assert_eq!(task.data().content(), "");

        let task = ExamTask::create(&layout, "66116:2020:09", 2, Some(5), None).unwrap();
        assert_eq!(task.data().relative_path(), "Examen/66116/2020/09/Thema-2/Aufgabe-5.tex");
        assert_eq!(task.legacy_embed_macro(), "\\ExamensAufgabeTA 66116 / 2020 / 9 : Thema 2 Aufgabe 5");

        let task = ExamTask::create(&layout, "46116:2015:03", 4, None, None).unwrap();
        assert_eq!(task.data().relative_path(), "Examen/46116/2015/03/Aufgabe-4.tex");
        assert_eq!(task.reference(), "46116-2015-F.A4");
    }

    #[test]
    fn test_create_rejects_bad_reference() {
        let layout = RepoLayout::new("/repo");
        assert!(ExamTask::create(&layout, "66116-2020-09", 1, None, None).is_err());
        assert!(matches!(
            ExamTask::create(&layout, "66116:2020:10", 1, None, None),
            Err(AufgabenError::InvalidMonth { month: 10 })
        ));
    }

    #[test]
    fn test_exam_task_requires_exam_path() {
        let layout = RepoLayout::new("/repo");
        let data = TaskData::from_content(&layout, "Module/Aufgabe_X.tex", "");
        assert!(matches!(ExamTask::from_data(data), Err(AufgabenError::InvalidExamTaskPath { .. })));
    }

    #[test]
    fn test_plain_task_fallbacks() {
        let layout = RepoLayout::new("/repo");
        let task = TaskData::from_content(
            &layout,
            "Module/30_AUD/20_Vollstaendige-Induktion/Aufgabe_Geometrische-Summenformel.tex",
            "\\section{Geometrische Summenformel}\n\\index{Induktion}\n",
        );
        assert_eq!(task.title(), "Geometrische Summenformel");
        assert_eq!(task.topic(), "keine Thematik");
        assert_eq!(task.processing(), &ProcessingStatus::Unknown);
        assert_eq!(task.correctness(), &Correctness::Unknown);
        assert_eq!(task.reference(), "AUD.Vollstaendige-Induktion.Geometrische-Summenformel");
        assert_eq!(task.title_with_topic(), "Geometrische Summenformel");
        assert_eq!(task.formatted_keywords(), " (Induktion)");
        assert!(task.has_title());
        assert_eq!(
            task.embed_macro(),
            "\\bAufgabe{Module/30_AUD/20_Vollstaendige-Induktion/Aufgabe_Geometrische-Summenformel}"
        );

        let empty = TaskData::from_content(&layout, "Module/Aufgabe_Leer.tex", "");
        assert_eq!(empty.title(), "Aufgabe");
        assert_eq!(empty.quoted_title(), "„Aufgabe“");
        assert_eq!(empty.formatted_keywords(), "");
        assert!(!empty.has_title());
    }

    #[test]
    fn test_topic_from_macro() {
        let layout = RepoLayout::new("/repo");
        let task = TaskData::from_content(&layout, "Aufgabe_Petri.tex", "\\bAufgabenTitel{Petri-Netz}");
        assert_eq!(task.topic(), "Petri-Netz");
        assert_eq!(task.title_with_topic(), "Aufgabe „Petri-Netz“");
    }

    #[test]
    fn test_invalid_status_is_kept_and_reported() {
        let layout = RepoLayout::new("/repo");
        let task = TaskData::from_content(
            &layout,
            "Aufgabe_X.tex",
            "\\bAufgabenMetadaten{\n  BearbeitungsStand = fertig,\n  Korrektheit = korrekt,\n}\n",
        );
        assert_eq!(task.processing().as_str(), "fertig");
        assert_eq!(task.processing_rank(), None);
        assert_eq!(task.correctness_rank(), Some(2));
        assert!(task.is_correct());
        assert_eq!(
            task.status_issues(),
            vec![StatusIssue::invalid(StatusField::Processing, "fertig")]
        );
    }

    #[test]
    fn test_metadata_round_trip() {
        let layout = RepoLayout::new("/repo");
        let task = Task::Plain(TaskData::from_content(
            &layout,
            "Module/30_AUD/Aufgabe_Master-Theorem.tex",
            "\\section{Master-Theorem}\n\\footcite[Seite 3]{aud:ab:2}\n\\index{Rekursion}\n",
        ));
        let block = render_plist(METADATA_MACRO, &task.metadata(), &BRACED_KEYS);
        let parsed = parse_metadata_block(&block).unwrap();
        assert_eq!(parsed.get("Titel"), Some("Master-Theorem"));
        assert_eq!(parsed.get("Thematik"), Some("keine Thematik"));
        assert_eq!(parsed.get("Referenz"), Some("AUD.Master-Theorem"));
        assert_eq!(parsed.get("ZitatSchluessel"), Some("aud:ab:2"));
        assert_eq!(parsed.get("ZitatBeschreibung"), Some("Seite 3"));
        assert_eq!(parsed.get("Ueberprueft"), Some("unbekannt"));
        assert_eq!(parsed.get("Stichwoerter"), Some("Rekursion"));

        let meta = task.metadata();
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "Titel",
                "Thematik",
                "Referenz",
                "RelativerPfad",
                "ZitatSchluessel",
                "ZitatBeschreibung",
                "BearbeitungsStand",
                "Korrektheit",
                "Ueberprueft",
                "Stichwoerter"
            ]
        );
    }

    #[test]
    fn test_exam_metadata() {
        let layout = RepoLayout::new("/repo");
        let data = TaskData::from_content(
            &layout,
            "Examen/66116/2021/03/Thema-2/Aufgabe-5.tex",
            "\\bAufgabenMetadaten{\n  Titel = {Aufgabe 5},\n  Thematik = {Regal mit DVDs},\n}\n",
        );
        let task = Task::Exam(Arc::new(ExamTask::from_data(data).unwrap()));
        let meta = task.metadata();
        assert_eq!(meta.get("Referenz"), Some("66116-2021-F.T2-A5"));
        assert_eq!(meta.get("EinzelpruefungsNr"), Some("66116"));
        assert_eq!(meta.get("Monat"), Some("03"));
        assert_eq!(meta.get("ThemaNr"), Some("2"));
        assert_eq!(meta.get("TeilaufgabeNr"), None);
        assert_eq!(meta.get("AufgabeNr"), Some("5"));

        let exam = task.as_exam().unwrap();
        assert_eq!(exam.short_title(), "„Regal mit DVDs“ 66116:2021:03 T2A5");
        assert_eq!(exam.task_only_title(), "Aufgabe 5");
    }

    #[test]
    fn test_task_load_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(dir.path());
        write(dir.path(), "Examen/66116/2020/09/Aufgabe-1.tex", "");
        write(dir.path(), "Module/Aufgabe_X.tex", "");
        write(dir.path(), "Module/Notiz.tex", "");

        assert!(Task::load(&layout, "Examen/66116/2020/09/Aufgabe-1.tex").unwrap().unwrap().is_exam());
        assert_eq!(
            Task::load(&layout, "Module/Aufgabe_X.tex").unwrap().unwrap().kind(),
            TaskKind::Plain
        );
        assert!(Task::load(&layout, "Module/Notiz.tex").unwrap().is_none());
    }

    #[test]
    fn test_compare_by_path() {
        let layout = RepoLayout::new("/repo");
        let a = Task::Plain(TaskData::from_content(&layout, "A/Aufgabe_1.tex", ""));
        let b = Task::Plain(TaskData::from_content(&layout, "B/Aufgabe_1.tex", ""));
        assert_eq!(Task::compare_by_path(&a, &b), Ordering::Less);
        assert_eq!(Task::compare_by_path(&b, &b), Ordering::Equal);
    }
}
