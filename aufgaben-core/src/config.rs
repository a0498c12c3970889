//! Configuration file shared by all bschlangaul tools
//!
//! ```json
//! {
//!   "hauptRepo": "examensAufgabenTex",
//!   "repos": {
//!     "examensAufgabenTex": { "name": "examens-aufgaben-tex", "lokalerPfad": "/home/jf/examens-aufgaben-tex" },
//!     "examenScans": { "name": "examen-scans", "lokalerPfad": "/home/jf/examen-scans" }
//!   },
//!   "einzelPruefungen": { "66116": "Datenbanksysteme / Softwaretechnologie (vertieft)" },
//!   "github": {
//!     "domain": "https://github.com/bschlangaul-sammlung",
//!     "url": "https://github.com/bschlangaul-sammlung/<name>",
//!     "rawUrl": "https://raw.githubusercontent.com/bschlangaul-sammlung/<name>/main",
//!     "main": "main"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AufgabenError, Result};
use crate::paths::RepoLayout;

/// Location of the configuration file unless overridden on the command line
pub const DEFAULT_CONFIG_PATH: &str = "/etc/bschlangaul.json";

/// Repository id of the exam scans
pub const SCANS_REPO_ID: &str = "examenScans";

const NAME_PLACEHOLDER: &str = "<name>";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Key into `repos`, e.g. `examensAufgabenTex`
    pub haupt_repo: String,

    pub repos: BTreeMap<String, Repository>,

    /// Exam number → subject, e.g. `66116` → `Datenbanksysteme / Softwaretechnologie (vertieft)`
    #[serde(default)]
    pub einzel_pruefungen: BTreeMap<String, String>,

    pub github: GithubConfig,

    /// Program used to open files with invalid metadata
    #[serde(default = "default_editor")]
    pub editor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Name on the hosting service, e.g. `examens-aufgaben-tex`
    pub name: String,

    /// Absolute path of the local checkout
    pub lokaler_pfad: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubConfig {
    pub domain: String,
    pub url: String,
    pub raw_url: String,
    pub main: String,
}

fn default_editor() -> String {
    "code".to_string()
}

impl Config {
    /// Read and parse the JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        info!(config_path = %path.display(), "Loading configuration");
        let content = fs::read_to_string(path).map_err(|e| AufgabenError::io(path, e))?;
        let config: Config = serde_json::from_str(&content)?;
        config.repository(&config.haupt_repo)?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// A configuration with a single main repository at `root`. The scans
    /// live in the same checkout.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let mut repos = BTreeMap::new();
        repos.insert(
            "examensAufgabenTex".to_string(),
            Repository { name: "examens-aufgaben-tex".to_string(), lokaler_pfad: root.into() },
        );
        Self {
            haupt_repo: "examensAufgabenTex".to_string(),
            repos,
            einzel_pruefungen: BTreeMap::new(),
            github: GithubConfig {
                domain: "https://github.com/bschlangaul-sammlung".to_string(),
                url: "https://github.com/bschlangaul-sammlung/<name>".to_string(),
                raw_url: "https://raw.githubusercontent.com/bschlangaul-sammlung/<name>/main"
                    .to_string(),
                main: "main".to_string(),
            },
            editor: default_editor(),
        }
    }

    pub fn with_subject(mut self, number: u32, subject: &str) -> Self {
        self.einzel_pruefungen.insert(number.to_string(), subject.to_string());
        self
    }

    pub fn repository(&self, id: &str) -> Result<&Repository> {
        self.repos.get(id).ok_or_else(|| AufgabenError::UnknownRepository { id: id.to_string() })
    }

    /// Layout of the main repository
    pub fn layout(&self) -> Result<RepoLayout> {
        Ok(RepoLayout::new(&self.repository(&self.haupt_repo)?.lokaler_pfad))
    }

    /// Directory scanned for `Scan.pdf` markers. Falls back to the main
    /// repository when no scan repository is configured.
    pub fn scans_root(&self) -> Result<PathBuf> {
        match self.repos.get(SCANS_REPO_ID) {
            Some(repo) => Ok(repo.lokaler_pfad.clone()),
            None => Ok(self.repository(&self.haupt_repo)?.lokaler_pfad.clone()),
        }
    }

    /// Raw content URL of a repository, e.g.
    /// `https://raw.githubusercontent.com/bschlangaul-sammlung/examen-scans/main`
    pub fn raw_url(&self, repo_id: &str) -> Result<String> {
        let repo = self.repository(repo_id)?;
        Ok(self.github.raw_url.replace(NAME_PLACEHOLDER, &repo.name))
    }

    pub fn main_raw_url(&self) -> Result<String> {
        self.raw_url(&self.haupt_repo)
    }

    /// Raw URL of the scan repository, or of the main repository if there is none
    pub fn scans_raw_url(&self) -> Result<String> {
        if self.repos.contains_key(SCANS_REPO_ID) {
            self.raw_url(SCANS_REPO_ID)
        } else {
            self.main_raw_url()
        }
    }

    /// Subject of an exam number, e.g. `66116` → `Datenbanksysteme / Softwaretechnologie (vertieft)`
    pub fn subject(&self, number: u32) -> Option<&str> {
        self.einzel_pruefungen.get(&number.to_string()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "hauptRepo": "examensAufgabenTex",
        "repos": {
            "examensAufgabenTex": { "name": "examens-aufgaben-tex", "lokalerPfad": "/repo" },
            "examenScans": { "name": "examen-scans", "lokalerPfad": "/scans" }
        },
        "einzelPruefungen": { "66116": "Datenbanksysteme / Softwaretechnologie (vertieft)" },
        "github": {
            "domain": "https://github.com/bschlangaul-sammlung",
            "url": "https://github.com/bschlangaul-sammlung/<name>",
            "rawUrl": "https://raw.githubusercontent.com/bschlangaul-sammlung/<name>/main",
            "main": "main"
        }
    }"#;

    #[test]
    fn test_parse_config() {
        let config: Config = serde_json::from_str(JSON).unwrap();
        assert_eq!(config.layout().unwrap().root(), Path::new("/repo"));
        assert_eq!(config.scans_root().unwrap(), PathBuf::from("/scans"));
        assert_eq!(config.editor, "code");
        assert_eq!(
            config.subject(66116),
            Some("Datenbanksysteme / Softwaretechnologie (vertieft)")
        );
        assert_eq!(config.subject(46111), None);
        assert_eq!(
            config.scans_raw_url().unwrap(),
            "https://raw.githubusercontent.com/bschlangaul-sammlung/examen-scans/main"
        );
    }

    #[test]
    fn test_load_rejects_unknown_main_repo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bschlangaul.json");
        fs::write(&path, JSON.replace("\"hauptRepo\": \"examensAufgabenTex\"", "\"hauptRepo\": \"fehlt\"")).unwrap();
        assert!(matches!(Config::load(&path), Err(AufgabenError::UnknownRepository { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/bschlangaul.json")).unwrap_err();
        assert!(matches!(err, AufgabenError::Io { .. }));
    }

    #[test]
    fn test_for_root_uses_main_repo_for_scans() {
        let config = Config::for_root("/repo");
        assert_eq!(config.scans_root().unwrap(), PathBuf::from("/repo"));
        assert_eq!(
            config.scans_raw_url().unwrap(),
            "https://raw.githubusercontent.com/bschlangaul-sammlung/examens-aufgaben-tex/main"
        );
    }
}
