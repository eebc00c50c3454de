mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loupe", about = "Face annotation review tools")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image dimensions and detection sidecar contents
    Info(commands::info::InfoArgs),
    /// Compute label placement for an image at a given view
    Layout(commands::layout::LayoutArgs),
    /// Print or save the default review configuration
    Config(commands::config::ConfigArgs),
    /// Encode or apply view sync messages
    Sync(commands::sync::SyncArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Layout(args) => commands::layout::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Sync(args) => commands::sync::run(args),
    }
}
