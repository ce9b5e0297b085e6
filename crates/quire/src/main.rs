//! quire CLI - Markdown book authoring tool.
//!
//! Provides commands for:
//! - `init`, `add`, `new`: create a book and grow its chapter lists
//! - `import`, `split`, `indent`: restructure manuscripts at their headings
//! - `build`: render the book to linked HTML pages
//! - `list markdown`, `list images`: inspect the book's files

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AddArgs, BuildArgs, Context, ImportArgs, IndentArgs, InitArgs, ListCommand, NewArgs, SplitArgs,
};
use output::Output;

/// quire - Markdown book authoring tool.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long, global = true, env = "QUIRE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a book in the current directory.
    Init(InitArgs),
    /// Add existing files or directories to the current chapter.
    Add(AddArgs),
    /// Create empty pages from titles.
    New(NewArgs),
    /// Create a book from a single markdown file.
    Import(ImportArgs),
    /// Split pages into several pages at their headings.
    Split(SplitArgs),
    /// Push every heading one level deeper.
    Indent(IndentArgs),
    /// Render the book to HTML.
    Build(BuildArgs),
    /// List files of the book.
    #[command(subcommand)]
    List(ListCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = ctrlc::set_handler(|| std::process::exit(0)) {
        tracing::warn!(error = %e, "Failed to install interrupt handler");
    }

    let result = Context::from_env(cli.config).and_then(|ctx| match cli.command {
        Commands::Init(args) => args.execute(&ctx),
        Commands::Add(args) => args.execute(&ctx),
        Commands::New(args) => args.execute(&ctx),
        Commands::Import(args) => args.execute(&ctx),
        Commands::Split(args) => args.execute(&ctx),
        Commands::Indent(args) => args.execute(&ctx),
        Commands::Build(args) => args.execute(&ctx),
        Commands::List(cmd) => cmd.execute(&ctx),
    });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
