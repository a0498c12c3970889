//! Path classification and repository-relative path handling
//!
//! Tasks are recognised by their file path alone:
//!
//! - exam tasks: `Examen/66116/2020/09/[Thema-1/][Teilaufgabe-1/]Aufgabe-1.tex`
//! - other tasks: any `.tex` file carrying the `Aufgabe_` marker

use std::path::{Path, PathBuf};

use regex_utils::task_path;

use crate::error::{AufgabenError, Result};
use crate::exam::ExamReference;

/// What kind of task a path denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Plain,
    Exam,
}

pub fn is_task(path: &str) -> bool {
    task_path::TASK.is_match(path)
}

pub fn is_exam_task(path: &str) -> bool {
    task_path::EXAM_TASK.is_match(path)
}

/// Classify a path. The exam pattern is checked first, so a path matching
/// both patterns is an exam task.
pub fn classify(path: &str) -> Option<TaskKind> {
    if is_exam_task(path) {
        Some(TaskKind::Exam)
    } else if is_task(path) {
        Some(TaskKind::Plain)
    } else {
        None
    }
}

/// Exam number, year and month of any path inside an exam directory
pub fn extract_exam_reference_from_path(path: &str) -> Result<ExamReference> {
    let invalid = || AufgabenError::InvalidExamPath { path: path.to_string() };
    let (number, year, month) = task_path::exam_directory(path).ok_or_else(invalid)?;
    Ok(ExamReference {
        number: number.parse().map_err(|_| invalid())?,
        year: year.parse().map_err(|_| invalid())?,
        month: month.parse().map_err(|_| invalid())?,
    })
}

/// `66116:2020:09` for any path inside an exam directory
pub fn exam_reference_from_path(path: &str) -> Result<String> {
    let (number, year, month) = task_path::exam_directory(path)
        .ok_or_else(|| AufgabenError::InvalidExamPath { path: path.to_string() })?;
    Ok(format!("{number}:{year}:{month}"))
}

/// Location of the repository checkout and the conversions between absolute
/// and repository-relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// An absolute path. Relative paths are taken relative to the repository root.
    pub fn normalize(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() || path.starts_with(&self.root) {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// The path relative to the repository root, e.g. `Examen/66116/2020/09/Aufgabe-1.tex`.
    /// Paths outside the repository are returned unchanged.
    pub fn relative(&self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.to_string_lossy().trim_start_matches('/').to_string()
    }

    pub fn join<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        segments.into_iter().fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prefers_exam_tasks() {
        let path = "Examen/66116/2020/09/Thema-1/Aufgabe-1.tex";
        assert!(is_exam_task(path));
        assert_eq!(classify(path), Some(TaskKind::Exam));

        // Also carries the generic marker, still an exam task
        let both = "Aufgabe_Sammlung/Examen/66116/2020/09/Aufgabe-1.tex";
        assert!(is_task(both));
        assert!(is_exam_task(both));
        assert_eq!(classify(both), Some(TaskKind::Exam));

        assert_eq!(classify("Module/30_AUD/Aufgabe_Master-Theorem.tex"), Some(TaskKind::Plain));
        assert_eq!(classify("Examen/66116/2020/09/Examen.tex"), None);
        assert_eq!(classify("README.md"), None);
    }

    #[test]
    fn test_extract_exam_reference() {
        let reference =
            extract_exam_reference_from_path("/repo/Examen/66116/2020/09/Thema-1/Aufgabe-1.tex")
                .unwrap();
        assert_eq!(reference, ExamReference { number: 66116, year: 2020, month: 9 });

        assert_eq!(
            exam_reference_from_path("66116/2021/03/Scan.pdf").unwrap(),
            "66116:2021:03"
        );
        assert!(matches!(
            extract_exam_reference_from_path("Module/Aufgabe_X.tex"),
            Err(AufgabenError::InvalidExamPath { .. })
        ));
    }

    #[test]
    fn test_layout_normalize_and_relative() {
        let layout = RepoLayout::new("/repo");
        assert_eq!(layout.normalize("Examen/Aufgabe-1.tex"), PathBuf::from("/repo/Examen/Aufgabe-1.tex"));
        assert_eq!(layout.normalize("/elsewhere/a.tex"), PathBuf::from("/elsewhere/a.tex"));
        assert_eq!(layout.relative("/repo/Examen/66116/2020/09"), "Examen/66116/2020/09");
        assert_eq!(layout.relative("Module/Aufgabe_X.tex"), "Module/Aufgabe_X.tex");
        assert_eq!(layout.join(["Examen", "66116"]), PathBuf::from("/repo/Examen/66116"));
    }
}
