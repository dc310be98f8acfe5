//! CLI for restaurant invoice reconciliation.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{check, config, merge, suppliers};

/// larder - reconcile incoming supplier invoices against the books
#[derive(Parser)]
#[command(name = "larder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an extracted invoice for duplicates and preview the merge
    Check(check::CheckArgs),

    /// Merge an extracted invoice into its stored duplicate
    Merge(merge::MergeArgs),

    /// Inspect and match suppliers
    Suppliers(suppliers::SuppliersArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// RUST_LOG wins when set; otherwise the -v count picks the level.
fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Check(args) => check::run(args, cli.config.as_deref()),
        Commands::Merge(args) => merge::run(args, cli.config.as_deref()),
        Commands::Suppliers(args) => suppliers::run(args, cli.config.as_deref()),
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
    }
}
