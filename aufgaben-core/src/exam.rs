//! Exams: one sitting of a state examination, identified by exam number,
//! year and month.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AufgabenError, Result};
use crate::paths::{self, RepoLayout};
use crate::task::ExamTask;
use crate::tree::ExamTaskTree;

/// Top-level directory of all exams in the repository
pub const EXAM_ROOT_DIR: &str = "Examen";

/// Marker file whose presence makes an exam known
pub const SCAN_FILE: &str = "Scan.pdf";

pub const OCR_FILE: &str = "OCR.txt";

/// `66116:2020:09`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExamReference {
    pub number: u32,
    pub year: u32,
    pub month: u32,
}

impl ExamReference {
    /// Parse `number:year:month`, e.g. `66116:2020:09`
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || AufgabenError::InvalidExamReference { reference: reference.to_string() };
        let parts: Vec<&str> = reference.split(':').collect();
        let [number, year, month] = parts.as_slice() else {
            return Err(invalid());
        };
        Ok(Self {
            number: number.trim().parse().map_err(|_| invalid())?,
            year: year.trim().parse().map_err(|_| invalid())?,
            month: month.trim().parse().map_err(|_| invalid())?,
        })
    }

    /// `Examen/66116/2020/09`
    pub fn relative_directory(&self) -> String {
        format!("{EXAM_ROOT_DIR}/{}/{}/{:02}", self.number, self.year, self.month)
    }
}

impl fmt::Display for ExamReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{:02}", self.number, self.year, self.month)
    }
}

/// There are two sittings per year, in March and in September.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Result<Self> {
        match month {
            3 => Ok(Self::Spring),
            9 => Ok(Self::Autumn),
            month => Err(AufgabenError::InvalidMonth { month }),
        }
    }

    /// `Frühjahr` or `Herbst`
    pub fn name(self) -> &'static str {
        match self {
            Self::Spring => "Frühjahr",
            Self::Autumn => "Herbst",
        }
    }

    /// `F` or `H`
    pub fn letter(self) -> char {
        match self {
            Self::Spring => 'F',
            Self::Autumn => 'H',
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Exam {
    reference: ExamReference,
    season: Season,

    /// Relative task path → task, e.g.
    /// `Examen/66116/2021/03/Thema-2/Teilaufgabe-2/Aufgabe-5.tex`
    tasks: BTreeMap<String, Arc<ExamTask>>,
}

impl Exam {
    /// Fails for any month other than 3 and 9
    pub fn new(number: u32, year: u32, month: u32) -> Result<Self> {
        Self::from_reference(ExamReference { number, year, month })
    }

    pub fn from_reference(reference: ExamReference) -> Result<Self> {
        let season = Season::from_month(reference.month)?;
        Ok(Self { reference, season, tasks: BTreeMap::new() })
    }

    /// `66116:2020:09`
    pub fn parse_reference(reference: &str) -> Result<Self> {
        Self::from_reference(ExamReference::parse(reference)?)
    }

    /// Any path inside the exam directory
    pub fn from_path(path: &str) -> Result<Self> {
        Self::from_reference(paths::extract_exam_reference_from_path(path)?)
    }

    pub fn reference(&self) -> ExamReference {
        self.reference
    }

    pub fn number(&self) -> u32 {
        self.reference.number
    }

    pub fn year(&self) -> u32 {
        self.reference.year
    }

    pub fn month(&self) -> u32 {
        self.reference.month
    }

    /// `03`
    pub fn month_padded(&self) -> String {
        format!("{:02}", self.reference.month)
    }

    /// `66116:2020:09`
    pub fn reference_string(&self) -> String {
        self.reference.to_string()
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn season_letter(&self) -> char {
        self.season.letter()
    }

    /// `2020 Herbst`
    pub fn year_season(&self) -> String {
        format!("{} {}", self.year(), self.season)
    }

    /// `Examen 66116 Herbst 2020`
    pub fn short_title(&self) -> String {
        format!("Examen {} {} {}", self.number(), self.season, self.year())
    }

    /// `Examen-Informatik_66116-2020-Herbst`
    pub fn file_name(&self) -> String {
        format!("Examen-Informatik_{}-{}-{}", self.number(), self.year(), self.season)
    }

    /// `Datenbanksysteme / Softwaretechnologie (vertieft)`
    pub fn subject<'c>(&self, config: &'c Config) -> Option<&'c str> {
        config.subject(self.number())
    }

    /// `Examen/66116/2020/09`
    pub fn relative_directory(&self) -> String {
        self.reference.relative_directory()
    }

    /// `<root>/Examen/66116/2020/09`
    pub fn directory(&self, layout: &RepoLayout) -> PathBuf {
        layout.root().join(self.relative_directory())
    }

    /// `<root>/Examen/66116/2020/09/Scan.pdf`
    pub fn path(&self, layout: &RepoLayout) -> PathBuf {
        self.directory(layout).join(SCAN_FILE)
    }

    /// An absolute path inside the exam directory
    pub fn make_path<I, S>(&self, layout: &RepoLayout, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        segments.into_iter().fold(self.directory(layout), |path, segment| path.join(segment))
    }

    fn scans_url(&self, config: &Config, file_name: &str) -> Result<String> {
        Ok(format!(
            "{}/{}/{}/{}/{}",
            config.scans_raw_url()?,
            self.number(),
            self.year(),
            self.month_padded(),
            file_name
        ))
    }

    pub fn scan_url(&self, config: &Config) -> Result<String> {
        self.scans_url(config, SCAN_FILE)
    }

    pub fn ocr_url(&self, config: &Config) -> Result<String> {
        self.scans_url(config, OCR_FILE)
    }

    pub fn tasks(&self) -> &BTreeMap<String, Arc<ExamTask>> {
        &self.tasks
    }

    pub(crate) fn register_task(&mut self, relative_path: String, task: Arc<ExamTask>) {
        self.tasks.insert(relative_path, task);
    }

    /// True only with more than one task: an exam with a single task is
    /// treated like an exam without tasks.
    pub fn has_tasks(&self) -> bool {
        self.tasks.len() > 1
    }

    /// Built fresh on every call, `None` unless [`Exam::has_tasks`]
    pub fn task_tree(&self) -> Option<ExamTaskTree<'_>> {
        if self.has_tasks() { ExamTaskTree::build(self) } else { None }
    }
}
