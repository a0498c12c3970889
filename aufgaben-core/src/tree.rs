//! Per-exam task tree and its visitor
//!
//! ```text
//! Thema 1
//!   Teilaufgabe 1
//!     Aufgabe 3
//!     Aufgabe 4
//! Thema 2
//!   Aufgabe 1
//! ```
//!
//! Topic and sub-task levels are optional, so a branch may hold tasks
//! directly. Which visitor callback fires is decided by the node name, not by
//! its depth.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use regex_utils::{task_path, tex};

use crate::error::{AufgabenError, Result};
use crate::exam::Exam;
use crate::task::ExamTask;

/// Numeric-aware, case-insensitive string order: `Aufgabe-2` sorts before `Aufgabe-10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        let ordering = match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                compare_digit_runs(&take_digits(&mut a), &take_digits(&mut b))
            }
            (Some(x), Some(y)) => {
                a.next();
                b.next();
                x.to_lowercase().cmp(y.to_lowercase())
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Collects non-empty callback results, joined by newlines.
#[derive(Debug, Default)]
pub(crate) struct OutputCollector {
    parts: Vec<String>,
}

impl OutputCollector {
    pub(crate) fn collect(&mut self, part: Option<String>) {
        if let Some(part) = part.filter(|p| !p.is_empty()) {
            self.parts.push(part);
        }
    }

    pub(crate) fn into_text(self) -> Option<String> {
        (!self.parts.is_empty()).then(|| self.parts.join("\n"))
    }
}

/// Callbacks of a task tree traversal. Implement only the ones you need;
/// every returned string is appended to the traversal output.
pub trait ExamTaskVisitor {
    fn enter_topic(&mut self, _topic: u32, _exam: &Exam) -> Option<String> {
        None
    }

    /// Only called below a topic
    fn enter_subtask(&mut self, _subtask: u32, _topic: u32, _exam: &Exam) -> Option<String> {
        None
    }

    fn enter_task(
        &mut self,
        _task: &ExamTask,
        _number: u32,
        _subtask: Option<u32>,
        _topic: Option<u32>,
    ) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub enum TreeNode<'a> {
    Group(Vec<(String, TreeNode<'a>)>),
    Task(&'a ExamTask),
}

impl TreeNode<'_> {
    fn leaf_count(&self) -> usize {
        match self {
            Self::Task(_) => 1,
            Self::Group(children) => children.iter().map(|(_, node)| node.leaf_count()).sum(),
        }
    }
}

/// `Thema-1` → `Thema 1`, `Aufgabe-3.tex` → `Aufgabe 3`
fn readable(segment: &str) -> String {
    segment.replacen('-', " ", 1).replacen(".tex", "", 1)
}

fn insert<'a>(nodes: &mut Vec<(String, TreeNode<'a>)>, segments: &[&str], task: &'a ExamTask) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let name = readable(segment);

    if segment.contains(".tex") {
        match nodes.iter().position(|(n, _)| *n == name) {
            Some(index) => nodes[index].1 = TreeNode::Task(task),
            None => nodes.push((name, TreeNode::Task(task))),
        }
        return;
    }

    let index = match nodes.iter().position(|(n, _)| *n == name) {
        Some(index) => {
            if matches!(nodes[index].1, TreeNode::Task(_)) {
                nodes[index].1 = TreeNode::Group(Vec::new());
            }
            index
        }
        None => {
            nodes.push((name, TreeNode::Group(Vec::new())));
            nodes.len() - 1
        }
    };
    if let TreeNode::Group(children) = &mut nodes[index].1 {
        insert(children, rest, task);
    }
}

#[derive(Debug, Default)]
struct Position {
    topic: Option<u32>,
    subtask: Option<u32>,
}

/// Tasks of one exam grouped by topic and sub-task, in natural path order
#[derive(Debug, Clone)]
pub struct ExamTaskTree<'a> {
    exam: &'a Exam,
    nodes: Vec<(String, TreeNode<'a>)>,
}

impl<'a> ExamTaskTree<'a> {
    /// `None` if the exam has no tasks at all
    pub fn build(exam: &'a Exam) -> Option<Self> {
        if exam.tasks().is_empty() {
            return None;
        }

        let mut paths: Vec<_> = exam.tasks().iter().collect();
        paths.sort_by(|(a, _), (b, _)| natural_cmp(a, b));

        let prefix = format!("{}/", exam.relative_directory());
        let mut nodes = Vec::new();
        for (path, task) in paths {
            let task_path = path.strip_prefix(&prefix).unwrap_or(path);
            if task_path::EXAM_TASK_SUFFIX.is_match(task_path) {
                let segments: Vec<&str> = task_path.split('/').collect();
                insert(&mut nodes, &segments, task.as_ref());
            }
        }
        Some(Self { exam, nodes })
    }

    pub fn exam(&self) -> &'a Exam {
        self.exam
    }

    pub fn nodes(&self) -> &[(String, TreeNode<'a>)] {
        &self.nodes
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().map(|(_, node)| node.leaf_count()).sum()
    }

    /// Walk topic, sub-task and task levels in order. `None` if no callback
    /// returned any text.
    pub fn visit<V: ExamTaskVisitor + ?Sized>(&self, visitor: &mut V) -> Result<Option<String>> {
        let mut output = OutputCollector::default();
        let mut position = Position::default();

        for (name, node) in &self.nodes {
            self.enter(0, name, node, &mut position, visitor, &mut output)?;
            let TreeNode::Group(children) = node else { continue };
            for (name, node) in children {
                self.enter(1, name, node, &mut position, visitor, &mut output)?;
                let TreeNode::Group(children) = node else { continue };
                for (name, node) in children {
                    self.enter(2, name, node, &mut position, visitor, &mut output)?;
                }
            }
        }
        Ok(output.into_text())
    }

    fn enter<V: ExamTaskVisitor + ?Sized>(
        &self,
        depth: usize,
        name: &str,
        node: &TreeNode<'a>,
        position: &mut Position,
        visitor: &mut V,
        output: &mut OutputCollector,
    ) -> Result<()> {
        match depth {
            0 => *position = Position::default(),
            1 => position.subtask = None,
            _ => {}
        }

        let number = tex::first_number(name)
            .ok_or_else(|| AufgabenError::MissingNodeNumber { name: name.to_string() })?;

        if name.starts_with("Thema ") {
            position.topic = Some(number);
            output.collect(visitor.enter_topic(number, self.exam));
        } else if name.starts_with("Teilaufgabe ") {
            position.subtask = Some(number);
            if let Some(topic) = position.topic {
                output.collect(visitor.enter_subtask(number, topic, self.exam));
            }
        } else if name.starts_with("Aufgabe ") {
            if let TreeNode::Task(task) = node {
                output.collect(visitor.enter_task(task, number, position.subtask, position.topic));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::RepoLayout;
    use crate::task::TaskData;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn exam_with(paths: &[&str]) -> Exam {
        let layout = RepoLayout::new("/repo");
        let mut exam = Exam::new(66116, 2020, 9).unwrap();
        for path in paths {
            let relative = format!("Examen/66116/2020/09/{path}");
            let task = ExamTask::from_data(TaskData::from_content(&layout, &relative, "")).unwrap();
            exam.register_task(relative, Arc::new(task));
        }
        exam
    }

    #[derive(Default)]
    struct TaskLister;

    impl ExamTaskVisitor for TaskLister {
        fn enter_task(
            &mut self,
            task: &ExamTask,
            _number: u32,
            _subtask: Option<u32>,
            _topic: Option<u32>,
        ) -> Option<String> {
            Some(task.task_reference())
        }
    }

    struct Outline;

    impl ExamTaskVisitor for Outline {
        fn enter_topic(&mut self, topic: u32, _exam: &Exam) -> Option<String> {
            Some(format!("T{topic}"))
        }

        fn enter_subtask(&mut self, subtask: u32, topic: u32, _exam: &Exam) -> Option<String> {
            Some(format!("  T{topic}/TA{subtask}"))
        }

        fn enter_task(
            &mut self,
            _task: &ExamTask,
            number: u32,
            subtask: Option<u32>,
            topic: Option<u32>,
        ) -> Option<String> {
            Some(format!("    {topic:?} {subtask:?} {number}"))
        }
    }

    #[test]
    fn test_natural_order() {
        assert_eq!(natural_cmp("Aufgabe-2.tex", "Aufgabe-10.tex"), Ordering::Less);
        assert_eq!(natural_cmp("Aufgabe-10.tex", "Aufgabe-2.tex"), Ordering::Greater);
        assert_eq!(natural_cmp("thema-1", "Thema-1"), Ordering::Equal);
        assert_eq!(natural_cmp("Thema-1/Aufgabe-9", "Thema-2/Aufgabe-1"), Ordering::Less);
        assert_eq!(natural_cmp("a", "ab"), Ordering::Less);
        assert_eq!(natural_cmp("x007", "x7"), Ordering::Equal);
    }

    #[test]
    fn test_leaf_count_equals_task_count() {
        let exam = exam_with(&[
            "Thema-1/Teilaufgabe-1/Aufgabe-1.tex",
            "Thema-1/Teilaufgabe-2/Aufgabe-1.tex",
            "Thema-1/Aufgabe-4.tex",
            "Thema-2/Aufgabe-1.tex",
            "Aufgabe-7.tex",
        ]);
        let tree = exam.task_tree().unwrap();
        assert_eq!(tree.leaf_count(), 5);
        let names: Vec<&str> = tree.nodes().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Aufgabe 7", "Thema 1", "Thema 2"]);
    }

    #[test]
    fn test_visit_tasks_in_file_order() {
        let exam = exam_with(&[
            "Thema-2/Teilaufgabe-1/Aufgabe-3.tex",
            "Thema-1/Teilaufgabe-1/Aufgabe-10.tex",
            "Thema-2/Teilaufgabe-1/Aufgabe-1.tex",
            "Thema-1/Teilaufgabe-1/Aufgabe-2.tex",
        ]);
        let output = exam.task_tree().unwrap().visit(&mut TaskLister).unwrap().unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["T1 TA1 A2", "T1 TA1 A10", "T2 TA1 A1", "T2 TA1 A3"]);
    }

    #[test]
    fn test_visit_mixed_depths() {
        let exam = exam_with(&["Thema-1/Teilaufgabe-2/Aufgabe-1.tex", "Thema-2/Aufgabe-3.tex"]);
        let output = exam.task_tree().unwrap().visit(&mut Outline).unwrap().unwrap();
        assert_eq!(
            output,
            "T1\n  T1/TA2\n    Some(1) Some(2) 1\nT2\n    Some(2) None 3"
        );
    }

    #[test]
    fn test_visit_without_callbacks() {
        struct Silent;
        impl ExamTaskVisitor for Silent {}

        let exam = exam_with(&["Aufgabe-1.tex", "Aufgabe-2.tex"]);
        assert_eq!(exam.task_tree().unwrap().visit(&mut Silent).unwrap(), None);
    }

    #[test]
    fn test_single_task_has_no_tree() {
        let exam = exam_with(&["Thema-1/Aufgabe-1.tex"]);
        assert!(!exam.has_tasks());
        assert!(exam.task_tree().is_none());
        // built directly, the tree still holds the task
        assert_eq!(ExamTaskTree::build(&exam).unwrap().leaf_count(), 1);
    }

    #[test]
    fn test_output_collector_skips_empty() {
        let mut output = OutputCollector::default();
        assert_eq!(OutputCollector::default().into_text(), None);
        output.collect(Some("a".to_string()));
        output.collect(Some(String::new()));
        output.collect(None);
        output.collect(Some("b".to_string()));
        assert_eq!(output.into_text(), Some("a\nb".to_string()));
    }
}
