//! Suppliers command - inspect the supplier list and test name matching.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use larder_core::reconcile::supplier::{clean, find_match, normalize_for_matching};
use larder_core::InvoiceStore;

use super::{load_config, open_store};

/// Arguments for the suppliers command.
#[derive(Args)]
pub struct SuppliersArgs {
    /// Store data directory (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: SuppliersCommand,
}

#[derive(Subcommand)]
enum SuppliersCommand {
    /// List known suppliers
    List,

    /// Resolve a raw extracted name against the known suppliers
    Match {
        /// Raw supplier name as extracted from a document
        name: String,
    },
}

pub fn run(args: SuppliersArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config, args.data_dir.as_deref());

    match args.command {
        SuppliersCommand::List => {
            let suppliers = store.list_suppliers()?;
            if suppliers.is_empty() {
                println!("No suppliers on file.");
                return Ok(());
            }
            for supplier in suppliers {
                println!("{}  {}", style(&supplier.id).dim(), supplier.name);
            }
        }
        SuppliersCommand::Match { name } => {
            println!("cleaned:    {}", clean(&name));
            println!("normalized: {}", normalize_for_matching(&name));

            let suppliers = store.list_suppliers()?;
            match find_match(&name, &suppliers) {
                Some(supplier) => println!(
                    "{} matched {} ({})",
                    style("✓").green(),
                    supplier.name,
                    supplier.id
                ),
                None => println!("{} no match; route to manual review", style("!").yellow()),
            }
        }
    }

    Ok(())
}
