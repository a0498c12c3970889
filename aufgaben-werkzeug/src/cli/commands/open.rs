//! `oeffne`: open the scan of an exam

use anyhow::{Result, bail};
use aufgaben_core::{Exam, RepoLayout};
use regex_utils::task_path::EXAM_REFERENCE;
use std::path::Path;

use super::{load_config, open_program};
use crate::cli::app::OpenArgs;

const PDF_VIEWER: &str = "xdg-open";

/// `66116:2020:09` as one argument or `66116 2020 09` as three
fn join_reference(parts: &[String]) -> String {
    parts.join(":")
}

pub fn execute(config_path: &Path, args: OpenArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let reference = join_reference(&args.referenz);

    if !EXAM_REFERENCE.is_match(&reference) {
        println!("Keine Examens-Referenz: {reference}");
        return Ok(());
    }

    let exam = Exam::parse_reference(&reference)?;
    let scan = exam.path(&RepoLayout::new(config.scans_root()?));
    if !scan.exists() {
        bail!("Kein Scan für {} gefunden: {}", exam.short_title(), scan.display());
    }
    println!("{}", scan.display());
    open_program(PDF_VIEWER, &scan)
}
