//! Clavier CLI - render note scores through the MIDI-controlled filter voice.

mod commands;
mod error;
mod score;
mod signal;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clavier")]
#[command(author, version, about = "Clavier filter voice CLI", long_about = None)]
struct Cli {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a score file to WAV
    Render(commands::render::RenderArgs),

    /// Print the magnitude response for a held note
    Response(commands::response::ResponseArgs),

    /// List filter modes and parameters
    Modes(commands::modes::ModesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Response(args) => commands::response::run(args),
        Commands::Modes(args) => commands::modes::run(args),
    }
}
