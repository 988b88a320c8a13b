//! t4a CLI - import T4A slips from CSV in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{fields, import, logs, totals};

/// t4a - import T4A slips from CSV files
#[derive(Parser)]
#[command(name = "t4a", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import slips from a CSV file
    Import(import::ImportArgs),

    /// List slip fields with their titles and header aliases
    Fields {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print the alias table nested by field group
        #[arg(long)]
        nested: bool,
    },

    /// Show T4A summary totals for a slip collection
    Totals {
        /// Slip collection file
        #[arg(default_value = "slips.json")]
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Import(_) => "import",
            Commands::Fields { .. } => "fields",
            Commands::Totals { .. } => "totals",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(logger) = commands::get_logger() {
        let _ = logger.log_command(cli.command.name());
    }

    match cli.command {
        Commands::Import(args) => import::run(args),
        Commands::Fields { json, nested } => fields::run(json, nested),
        Commands::Totals { file, json } => totals::run(&file, json),
        Commands::Logs { command } => logs::run(command),
    }
}
