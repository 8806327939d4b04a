mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{export, fragments, init, profiles, ExportArgs, FragmentsCommand, InitArgs};

/// Folio CLI - export structured articles for restrictive publishing platforms
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Folio project
    Init(InitArgs),

    /// Export articles to platform-safe HTML
    Export(ExportArgs),

    /// Browse and insert catalog fragments
    Fragments {
        #[command(subcommand)]
        command: FragmentsCommand,
    },

    /// List export profiles and background presets
    Profiles,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot read current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Export(args) => export(args, &cwd),
        Command::Fragments { command } => fragments(command, &cwd),
        Command::Profiles => profiles(&cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
