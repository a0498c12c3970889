//! Aufgaben Core Library
//!
//! Indexing of a LaTeX exam task collection: path classification, metadata
//! extraction, task and exam entities, per-exam task trees with a visitor,
//! the keyword vocabulary and the documents generated from them.

pub mod collection;
pub mod config;
pub mod error;
pub mod exam;
pub mod generators;
pub mod keywords;
pub mod metadata;
pub mod paths;
pub mod readme;
pub mod status;
pub mod task;
pub mod tree;

pub use collection::{ExamCollection, ExamVisitor, Registry, TaskCollection};
pub use config::Config;
pub use error::{AufgabenError, Result};
pub use exam::{Exam, ExamReference, Season};
pub use keywords::{KEYWORD_FILE, KeywordIndex, KeywordTree};
pub use paths::{RepoLayout, TaskKind};
pub use task::{ExamTask, Task, TaskData};
pub use tree::{ExamTaskTree, ExamTaskVisitor};
