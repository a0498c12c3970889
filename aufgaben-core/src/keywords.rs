//! Keyword vocabulary (`Stichwortverzeichnis.yml`) and the keyword index
//!
//! The vocabulary is a YAML tree. Every keyword appears once, either as a
//! plain list entry or as a mapping key whose value holds the narrower
//! keywords:
//!
//! ```yaml
//! - Algorithmen:
//!   - Sortieralgorithmen:
//!     - Bubblesort
//!     - Quicksort
//!   - Master-Theorem
//! - Datenbanken
//! ```
//!
//! `\index{...}` keywords of the tasks must come from this vocabulary.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde_yaml::Value;
use similar::TextDiff;
use tracing::{debug, info};

use crate::collection::TaskCollection;
use crate::error::{AufgabenError, Result};
use crate::status::StatusIssue;
use crate::task::Task;

/// File name of the vocabulary in the repository root
pub const KEYWORD_FILE: &str = "Stichwortverzeichnis.yml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordNode {
    pub name: String,
    pub children: Vec<KeywordNode>,
}

impl KeywordNode {
    fn leaf(name: &str) -> Self {
        Self { name: name.to_string(), children: Vec::new() }
    }

    fn collect_names(&self, names: &mut BTreeSet<String>) {
        names.insert(self.name.clone());
        for child in &self.children {
            child.collect_names(names);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTree {
    roots: Vec<KeywordNode>,
    flat: BTreeSet<String>,
}

impl KeywordTree {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AufgabenError::io(path, e))?;
        let tree = Self::from_yaml(&text)?;
        info!(count = tree.len(), path = %path.display(), "Loaded keyword vocabulary");
        Ok(tree)
    }

    /// Fails on an empty document, on a keyword listed twice and on entries
    /// that are neither strings, lists nor mappings.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        if value.is_null() {
            return Err(AufgabenError::InvalidKeywordTree { reason: "leeres Dokument".to_string() });
        }
        let mut tree = Self::default();
        let mut roots = Vec::new();
        tree.normalize(&value, &mut roots)?;
        tree.roots = roots;
        Ok(tree)
    }

    fn add(&mut self, keyword: &str) -> Result<()> {
        if !self.flat.insert(keyword.to_string()) {
            return Err(AufgabenError::DuplicateKeyword { keyword: keyword.to_string() });
        }
        Ok(())
    }

    fn normalize(&mut self, value: &Value, nodes: &mut Vec<KeywordNode>) -> Result<()> {
        match value {
            Value::String(keyword) => {
                self.add(keyword)?;
                nodes.push(KeywordNode::leaf(keyword));
            }
            Value::Sequence(entries) => {
                for entry in entries {
                    self.normalize(entry, nodes)?;
                }
            }
            Value::Mapping(mapping) => {
                for (key, children) in mapping {
                    let keyword = key.as_str().ok_or_else(|| AufgabenError::InvalidKeywordTree {
                        reason: format!("Schlüssel ist kein Text: {key:?}"),
                    })?;
                    self.add(keyword)?;
                    let mut node = KeywordNode::leaf(keyword);
                    if !children.is_null() {
                        self.normalize(children, &mut node.children)?;
                    }
                    nodes.push(node);
                }
            }
            other => {
                return Err(AufgabenError::InvalidKeywordTree {
                    reason: format!("unbekannter Datentyp: {other:?}"),
                });
            }
        }
        Ok(())
    }

    pub fn roots(&self) -> &[KeywordNode] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// All keywords in alphabetical order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.flat.iter().map(String::as_str)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.flat.contains(keyword)
    }

    /// The node of `keyword`, depth first
    pub fn find(&self, keyword: &str) -> Option<&KeywordNode> {
        fn search<'t>(nodes: &'t [KeywordNode], keyword: &str) -> Option<&'t KeywordNode> {
            nodes.iter().find_map(|node| {
                if node.name == keyword { Some(node) } else { search(&node.children, keyword) }
            })
        }
        search(&self.roots, keyword)
    }

    /// `keyword` and every narrower keyword below it. Empty for unknown keywords.
    pub fn subtree_keywords(&self, keyword: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if let Some(node) = self.find(keyword) {
            node.collect_names(&mut names);
        }
        names
    }

    /// The most similar keyword of the vocabulary
    pub fn suggest(&self, search: &str) -> Option<&str> {
        let mut best: Option<(f32, &str)> = None;
        for keyword in &self.flat {
            let ratio = TextDiff::from_chars(search, keyword.as_str()).ratio();
            if best.is_none_or(|(best_ratio, _)| ratio > best_ratio) {
                best = Some((ratio, keyword.as_str()));
            }
        }
        best.map(|(_, keyword)| keyword)
    }

    /// One issue per keyword missing from the vocabulary
    pub fn check(&self, keywords: &[String]) -> Vec<StatusIssue> {
        keywords
            .iter()
            .filter(|keyword| !self.contains(keyword))
            .map(|keyword| StatusIssue::unknown_keyword(keyword.as_str(), self.suggest(keyword).map(str::to_string)))
            .collect()
    }
}

/// Keyword → tasks carrying it
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex<'r> {
    entries: BTreeMap<&'r str, Vec<&'r Task>>,
}

impl<'r> KeywordIndex<'r> {
    pub fn build(tasks: &'r TaskCollection) -> Self {
        let mut entries: BTreeMap<&'r str, Vec<&'r Task>> = BTreeMap::new();
        for task in tasks.iter() {
            for keyword in task.data().keywords() {
                entries.entry(keyword.as_str()).or_default().push(task);
            }
        }
        debug!(keywords = entries.len(), "Built keyword index");
        Self { entries }
    }

    /// Ordered by relative path
    pub fn tasks_with(&self, keyword: &str) -> &[&'r Task] {
        self.entries.get(keyword).map(Vec::as_slice).unwrap_or_default()
    }

    /// Tasks carrying `keyword` or any narrower keyword, ordered by path,
    /// each task once
    pub fn tasks_in_subtree(&self, tree: &KeywordTree, keyword: &str) -> Vec<&'r Task> {
        let mut tasks: BTreeMap<&'r str, &'r Task> = BTreeMap::new();
        for keyword in tree.subtree_keywords(keyword) {
            for &task in self.tasks_with(&keyword) {
                tasks.insert(task.relative_path(), task);
            }
        }
        tasks.into_values().collect()
    }
}
