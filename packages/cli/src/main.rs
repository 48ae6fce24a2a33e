mod commands;
mod config;
mod store;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, init, new, preview, publish, ApplyArgs, InitArgs, NewArgs, PreviewArgs, PublishArgs};

/// Pagecraft CLI - block-based page editing from the command line
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Pagecraft site
    Init(InitArgs),

    /// Create a page with starter sections
    New(NewArgs),

    /// Apply a JSON script of edits to a page
    Apply(ApplyArgs),

    /// Print the grid layout of a page for one breakpoint
    Preview(PreviewArgs),

    /// Publish a page, or save it as a draft
    Publish(PublishArgs),
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::New(args) => new(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
        Command::Preview(args) => preview(args, &cwd),
        Command::Publish(args) => publish(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
