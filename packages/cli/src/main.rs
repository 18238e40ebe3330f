mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    init, inspect, listen, sync, title, InitArgs, InspectArgs, ListenArgs, SyncArgs, TitleArgs,
};
use tracing_subscriber::EnvFilter;

/// Folio CLI - inspect content bodies and watch notifications
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a folio.config.json with default endpoints
    Init(InitArgs),

    /// Show the blocks of a body array or content record
    Inspect(InspectArgs),

    /// Print the title a save would derive for a post
    Title(TitleArgs),

    /// Merge a record's media_urls into its body
    Sync(SyncArgs),

    /// Stream live notifications
    Listen(ListenArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Inspect(args) => inspect(args),
            Command::Title(args) => title(args),
            Command::Sync(args) => sync(args),
            Command::Listen(args) => listen(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
