//! ProbeMapper - probe-to-headstage channel mapping tool
//!
//! Maps NeuroNexus probe channels through Omnetics connectors onto Intan
//! headstage channels and writes per-shank text files and Neuroscope XML
//! parameter files for both headstage orientations.

use clap::{Parser, Subcommand};
use probemapper::cli::{ConfigArgs, LayoutsArgs, MapArgs, ValidateArgs};
use probemapper::constants::APP_BINARY_NAME;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ProbeMapper - map probe channels onto Intan headstage channels
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Map probe channels and write text and Neuroscope files
    Map(MapArgs),
    /// Validate a mapping request without writing files
    Validate(ValidateArgs),
    /// List or inspect connector and headstage layouts
    Layouts(LayoutsArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so reports and JSON on stdout stay clean
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Map(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
        Commands::Layouts(args) => args.execute(),
        Commands::Config(args) => args.execute(),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code.code());
    }
}
