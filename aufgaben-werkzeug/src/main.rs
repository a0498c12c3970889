use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::{Cli, Commands, commands};

fn main() -> Result<()> {
    let Cli { verbose, config, command } = Cli::parse();

    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    debug!(?command, config = %config.display(), "Dispatching command");

    match command {
        Commands::Metadata(args) => commands::metadata::execute(&config, args),
        Commands::NewTask(args) => commands::scaffold::execute_task(args),
        Commands::NewExamTask(args) => commands::scaffold::execute_exam_task(&config, args),
        Commands::Open(args) => commands::open::execute(&config, args),
        Commands::Validate(args) => commands::validate::execute(&config, args),
        Commands::Code(args) => commands::edit::execute(&config, args),
        Commands::OpenKeyword(args) => commands::edit::execute_keyword(&config, args),
        Commands::Collections(command) => commands::collections::execute(&config, command),
    }
}
