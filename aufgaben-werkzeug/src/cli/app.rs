use aufgaben_core::config::DEFAULT_CONFIG_PATH;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "aufgaben-werkzeug",
    version,
    about = "Werkzeug für die Examens-Aufgaben-Sammlung",
    long_about = "Erzeugt Metadaten, Aufgaben-Vorlagen und Sammel-Dokumente für eine Sammlung von LaTeX-Aufgaben und Staatsexamen."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "AUFGABEN_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the metadata block of a task file
    #[command(name = "metadaten", visible_alias = "m", about = "Metadaten einer Aufgabe erzeugen und in die Datei schreiben")]
    Metadata(MetadataArgs),

    /// Create a plain task in the current directory
    #[command(name = "erzeuge-aufgabe", visible_alias = "a", about = "Eine neue Aufgabe im aktuellen Verzeichnis erzeugen")]
    NewTask(NewTaskArgs),

    /// Create an exam task
    #[command(name = "erzeuge-examens-aufgabe", visible_alias = "e", about = "Eine neue Examensaufgabe erzeugen")]
    NewExamTask(NewExamTaskArgs),

    /// Open the scan of an exam
    #[command(name = "oeffne", visible_alias = "o", about = "Den Scan eines Examens öffnen")]
    Open(OpenArgs),

    /// Report invalid status values
    #[command(name = "validiere", visible_alias = "v", about = "Ungültige Metadaten aller Aufgaben auflisten")]
    Validate(ValidateArgs),

    /// Open task files in the editor
    #[command(name = "code", visible_alias = "c", about = "Aufgaben-Dateien im Editor öffnen")]
    Code(CodeArgs),

    /// Open every task tagged with a keyword
    #[command(name = "oeffne-stichwort", visible_alias = "k", about = "Alle Aufgaben zu einem Stichwort öffnen")]
    OpenKeyword(OpenKeywordArgs),

    /// Generate collection documents
    #[command(name = "sammlungen", visible_alias = "s", subcommand, about = "Sammel-Dokumente erzeugen")]
    Collections(CollectionCommands),
}

#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Task file
    #[arg(help = "Pfad zur TeX-Datei der Aufgabe")]
    pub datei: PathBuf,
}

#[derive(Args, Debug)]
pub struct NewTaskArgs {
    #[arg(help = "Titel der Aufgabe, wird Teil des Dateinamens")]
    pub titel: Option<String>,
}

#[derive(Args, Debug)]
pub struct NewExamTaskArgs {
    #[arg(help = "Examens-Referenz, z. B. 66116:2021:03")]
    pub referenz: String,

    /// Topic, sub-task or task number
    #[arg(help = "Thema-Nummer, Teilaufgaben-Nummer oder Aufgaben-Nummer")]
    pub thema: u32,

    #[arg(help = "Teilaufgabe-Nummer oder Aufgabe-Nummer")]
    pub teilaufgabe: Option<u32>,

    #[arg(help = "Aufgabe-Nummer")]
    pub aufgabe: Option<u32>,
}

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// `66116:2020:09` or `66116 2020 09`
    #[arg(required = true, num_args = 1.., help = "Examens-Referenz, z. B. 66116:2020:09")]
    pub referenz: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Without this flag the issues are only listed
    #[arg(
        short,
        long,
        help = "Jede Datei mit ungültigen Metadaten im konfigurierten Editor öffnen (ohne diese Option werden die Fehler nur aufgelistet)"
    )]
    pub oeffne_editor: bool,
}

#[derive(Args, Debug)]
pub struct CodeArgs {
    /// Relative to the working directory
    #[arg(default_value = "**/*.tex", help = "Glob-Muster der zu öffnenden Dateien, relativ zum Arbeitsverzeichnis")]
    pub glob: String,

    /// Only files without `\index{...}`
    #[arg(short = 'n', long, help = "Nur Dateien ohne Stichwörter öffnen")]
    pub kein_index: bool,

    /// Only files without a title in the metadata or a `\section`
    #[arg(short = 't', long, help = "Nur Dateien ohne Titel öffnen")]
    pub kein_titel: bool,
}

#[derive(Args, Debug)]
pub struct OpenKeywordArgs {
    #[arg(help = "Stichwort aus dem Stichwortverzeichnis")]
    pub stichwort: String,
}

#[derive(Subcommand, Debug)]
pub enum CollectionCommands {
    /// One `Examen.tex` per exam embedding all its tasks
    #[command(name = "examen")]
    ExamSolutions,

    /// One document per exam number with all scans
    #[command(name = "examen-scans")]
    ExamScans,

    /// Markdown overview of all exams
    #[command(name = "uebersicht")]
    Overview,

    /// A document embedding all tasks of a minimum status
    #[command(name = "aufgaben")]
    Tasks(TaskCollectionArgs),

    /// `README.md` of the task repository and of the scan repository
    #[command(name = "readme")]
    Readme,
}

#[derive(Args, Debug)]
pub struct TaskCollectionArgs {
    /// Minimum processing rank
    #[arg(short, long, default_value_t = 4, help = "Mindest-Bearbeitungsstand (0: unbekannt, 1: OCR, 2: TeX-Fehler, 3: nur Angabe, 4: mit Lösung)")]
    pub bearbeitungsstand: usize,

    /// Minimum correctness rank
    #[arg(short, long, help = "Mindest-Korrektheit (0: wahrscheinlich falsch, 1: unbekannt, 2: korrekt, 3: korrekt und überprüft)")]
    pub korrektheit: Option<usize>,

    /// Only exam tasks
    #[arg(short = 'e', long, conflicts_with = "nur_module")]
    pub nur_examen: bool,

    /// Only tasks outside of exams
    #[arg(short = 'm', long)]
    pub nur_module: bool,

    /// Target file, relative to the repository root
    #[arg(short, long, default_value = "Aufgaben-Sammlung.tex")]
    pub ziel: PathBuf,
}
