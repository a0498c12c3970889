//! Error types for the task collection
//!
//! Only the hard failures live here: a malformed exam path, an unreadable
//! reference or an impossible month means a file in the repository has to be
//! fixed by hand before anything can be generated. Soft validation problems
//! are carried as data, see [`crate::status::StatusIssue`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AufgabenError {
    /// The path looked like an exam task but does not follow
    /// `<nummer>/<jahr>/<monat>/[Thema-N/][Teilaufgabe-N/]Aufgabe-N.tex`
    #[error("Konnte den Pfad der Examensaufgabe nicht lesen: {path}")]
    InvalidExamTaskPath { path: String },

    /// No `<nummer>/<jahr>/<monat>/` directory found in the path
    #[error("Konnte den Examenspfad nicht lesen: {path}")]
    InvalidExamPath { path: String },

    #[error("Eine Examens-Referenz muss in diesem Format sein: 66116:2020:09 (erhalten: {reference})")]
    InvalidExamReference { reference: String },

    #[error("Die Monatsangabe eines Examens darf nur 3 oder 9 lauten, nicht {month}")]
    InvalidMonth { month: u32 },

    /// A node in an exam task tree carries no number in its name
    #[error("Konnte keine Zahl finden in „{name}“")]
    MissingNodeNumber { name: String },

    #[error("Unbekanntes Repository in der Konfiguration: {id}")]
    UnknownRepository { id: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Doppeltes Stichwort: {keyword}")]
    DuplicateKeyword { keyword: String },

    #[error("Ungültiges Stichwortverzeichnis: {reason}")]
    InvalidKeywordTree { reason: String },

    #[error("Stichwortverzeichnis nicht lesbar: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),
}

impl AufgabenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AufgabenError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, AufgabenError>;
