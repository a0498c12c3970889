//! Compiled patterns for task paths and TeX markup
//!
//! Each pattern is built once per process on first use.

use once_cell::sync::Lazy;
use regex::Regex;

/// Patterns over repository paths of task files
pub mod task_path {
    use super::*;

    /// Any file whose name carries the `Aufgabe_` marker, e.g.
    /// `Module/30_AUD/Aufgabe_Master-Theorem.tex`.
    pub static TASK: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"Aufgabe_.*\.tex").expect("Invalid regex pattern"));

    /// `<nummer>/<jahr>/<monat>/[Thema-N/][Teilaufgabe-N/]Aufgabe-N.tex` at the end of a path.
    pub static EXAM_TASK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?P<nummer>\d{5})/(?P<jahr>\d{4})/(?P<monat>\d{2})/(?:Thema-(?P<thema>\d)/)?(?:Teilaufgabe-(?P<teilaufgabe>\d)/)?Aufgabe-(?P<aufgabe>\d+)\.tex$",
        )
        .expect("Invalid regex pattern")
    });

    /// The exam task pattern without the exam directory. Matches paths
    /// relative to an exam directory.
    pub static EXAM_TASK_SUFFIX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?:Thema-(?P<thema>\d)/)?(?:Teilaufgabe-(?P<teilaufgabe>\d)/)?Aufgabe-(?P<aufgabe>\d+)\.tex$",
        )
        .expect("Invalid regex pattern")
    });

    /// Any path below an exam directory `<nummer>/<jahr>/<monat>/`.
    pub static EXAM_DIRECTORY: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^.*(?P<nummer>\d{5})/(?P<jahr>\d{4})/(?P<monat>\d{2})/.*$")
            .expect("Invalid regex pattern")
    });

    /// A textual exam reference such as `66116:2020:09`.
    pub static EXAM_REFERENCE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\d{5}:\d{4}:\d{2}").expect("Invalid regex pattern"));

    /// Numeric ordering prefixes like `30_` in `Module/30_AUD`.
    pub static ORDER_PREFIX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\d\d_").expect("Invalid regex pattern"));

    /// Exam directory components `(nummer, jahr, monat)` of a path, as written in the path.
    pub fn exam_directory(path: &str) -> Option<(&str, &str, &str)> {
        let caps = EXAM_DIRECTORY.captures(path)?;
        Some((
            caps.name("nummer")?.as_str(),
            caps.name("jahr")?.as_str(),
            caps.name("monat")?.as_str(),
        ))
    }
}

/// Patterns over the TeX markup of a task
pub mod tex {
    use super::*;

    /// The interior of the first `\bAufgabenMetadaten{ ... \n}` block.
    pub static METADATA_BLOCK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?s)\\bAufgabenMetadaten\{(.*?)\n\}").expect("Invalid regex pattern")
    });

    /// A complete metadata block including its trailing newline, used for replacement.
    pub static METADATA_BLOCK_WITH_NEWLINE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?s)\\bAufgabenMetadaten\{.+?,?\n\}\n").expect("Invalid regex pattern")
    });

    pub static SECTION: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\\section\{(.+?)[\n\\}{]").expect("Invalid regex pattern")
    });

    /// `\footcite[description]{key}`, description optional.
    pub static FOOTCITE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\\footcite(?:\[(?P<beschreibung>[^\]]+)\])?\{(?P<schluessel>[^}]+)\}")
            .expect("Invalid regex pattern")
    });

    pub static BEGIN_DOCUMENT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(\\begin\{document\})").expect("Invalid regex pattern"));

    pub static WHITESPACE_RUN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    pub static FIRST_NUMBER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\d+").expect("Invalid regex pattern"));

    /// Builds `\<name>{<argument>}` with the argument in group 1.
    pub fn macro_argument(name: &str) -> Regex {
        Regex::new(&format!(r"\\{}\{{([^}}]*)\}}", regex::escape(name)))
            .expect("Invalid regex pattern")
    }

    /// First run of digits in `text`.
    pub fn first_number(text: &str) -> Option<u32> {
        FIRST_NUMBER.find(text).and_then(|m| m.as_str().parse().ok())
    }
}
