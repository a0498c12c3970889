//! Task metadata embedded in the TeX source
//!
//! The block grammar is deliberately minimal:
//!
//! ```text
//! block := "\bAufgabenMetadaten{" NEWLINE line* NEWLINE "}"
//! line  := key "=" value ","?
//! ```
//!
//! Keys and values are trimmed, a leading `{` and a trailing `},` or `,` are
//! stripped from both. Lines that do not contain exactly one `=` are skipped.
//! Values containing `=` are therefore dropped.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use regex_utils::tex;

/// Macro wrapping the metadata block in task files
pub const METADATA_MACRO: &str = "bAufgabenMetadaten";

/// Macro carrying the topic in files without metadata
pub const TOPIC_MACRO: &str = "bAufgabenTitel";

/// Macro marking keywords, `\index{Master-Theorem}`
pub const KEYWORD_MACRO: &str = "index";

pub const FALLBACK_TITLE: &str = "Aufgabe";
pub const FALLBACK_TOPIC: &str = "keine Thematik";
pub const UNKNOWN: &str = "unbekannt";

/// Keys whose values are wrapped in braces when the block is rendered
pub const BRACED_KEYS: [&str; 5] = ["Titel", "Thematik", "ZitatBeschreibung", "Stichwoerter", "Ueberprueft"];

static KEYWORD: Lazy<Regex> = Lazy::new(|| tex::macro_argument(KEYWORD_MACRO));

/// Ordered key/value pairs of a metadata block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Set a value. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First citation of a task, `\footcite[description]{key}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub key: String,
    pub description: Option<String>,
}

fn clean(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(stripped) = text.strip_suffix(',') {
        text = stripped.strip_suffix('}').unwrap_or(stripped);
    }
    text.strip_prefix('{').unwrap_or(text).trim()
}

/// Parse the first `\bAufgabenMetadaten{...}` block, `None` if the content has none.
pub fn parse_metadata_block(content: &str) -> Option<Metadata> {
    let caps = tex::METADATA_BLOCK.captures(content)?;
    let mut metadata = Metadata::new();
    for line in caps[1].split('\n') {
        let parts: Vec<&str> = line.split('=').collect();
        if let [key, value] = parts.as_slice() {
            metadata.insert(clean(key), clean(value));
        }
    }
    Some(metadata)
}

/// All `\index{...}` keywords, whitespace runs collapsed, first occurrence wins.
pub fn extract_keywords(content: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for caps in KEYWORD.captures_iter(content) {
        let keyword = tex::WHITESPACE_RUN.replace_all(&caps[1], " ").into_owned();
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}

pub fn extract_first_citation(content: &str) -> Option<Citation> {
    let caps = tex::FOOTCITE.captures(content)?;
    Some(Citation {
        key: caps["schluessel"].to_string(),
        description: caps.name("beschreibung").map(|m| m.as_str().to_string()),
    })
}

/// Argument of the first `\<name>{...}` call
pub fn first_macro_argument(name: &str, content: &str) -> Option<String> {
    tex::macro_argument(name).captures(content).map(|caps| caps[1].to_string())
}

/// Argument of the first `\section{...}`
pub fn section_title(content: &str) -> Option<String> {
    tex::SECTION.captures(content).map(|caps| caps[1].to_string())
}

fn wrap_in_braces(value: &str) -> String {
    let value = value.trim();
    if value.starts_with('{') || value.ends_with('}') {
        value.to_string()
    } else {
        format!("{{{value}}}")
    }
}

/// Render a key/value block:
///
/// ```latex
/// \bAufgabenMetadaten{
///   Titel = {Aufgabe 2},
///   Thematik = {Petri-Netz},
///   RelativerPfad = Examen/46116/2016/03/Thema-2/Teilaufgabe-1/Aufgabe-2.tex,
/// }
/// ```
pub fn render_plist(macro_name: &str, metadata: &Metadata, braced_keys: &[&str]) -> String {
    let lines: Vec<String> = metadata
        .iter()
        .map(|(key, value)| {
            let value =
                if braced_keys.contains(&key) { wrap_in_braces(value) } else { value.to_string() };
            format!("  {key} = {value},")
        })
        .collect();
    format!("\\{macro_name}{{\n{}\n}}", lines.join("\n"))
}

/// Put `block` into `content`: replace an existing metadata block, or insert
/// the block right after `\begin{document}`. `None` if nothing changed.
pub fn replace_metadata_block(content: &str, block: &str) -> Option<String> {
    let block = format!("{block}\n");
    let replaced = if content.contains(&format!("\\{METADATA_MACRO}{{")) {
        tex::METADATA_BLOCK_WITH_NEWLINE.replace(content, NoExpand(&block)).into_owned()
    } else {
        tex::BEGIN_DOCUMENT
            .replace(content, |caps: &regex::Captures| format!("{}\n{}", &caps[1], block))
            .into_owned()
    };
    (replaced != content).then_some(replaced)
}
