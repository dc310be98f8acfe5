//! Merge command - apply a reviewed merge and persist the result.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use larder_core::{ExtractedInvoice, MergeOptions, ReconcileOutcome, Reconciler};

use super::{load_config, open_store};

/// Arguments for the merge command.
#[derive(Args)]
pub struct MergeArgs {
    /// Extracted invoice JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Store data directory (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Fold the new line items into the stored ones
    #[arg(long)]
    merge_line_items: bool,

    /// Recompute invoice totals from the merged line items
    #[arg(long)]
    update_totals: bool,

    /// Keep the stored source document instead of the new upload
    #[arg(long)]
    keep_existing_file: bool,
}

pub fn run(args: MergeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config, args.data_dir.as_deref());
    let reconciler = Reconciler::new(&store, config.reconcile.clone());

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let extracted: ExtractedInvoice = serde_json::from_str(&fs::read_to_string(&args.input)?)?;

    let options = MergeOptions {
        merge_line_items: args.merge_line_items,
        update_totals: args.update_totals,
        keep_existing_file: args.keep_existing_file,
    };

    match reconciler.reconcile(&extracted, options)? {
        ReconcileOutcome::UnresolvedSupplier => {
            anyhow::bail!(
                "No supplier match for {:?}; add the supplier or fix the extraction first.",
                extracted.supplier_name.as_deref().unwrap_or("")
            );
        }
        ReconcileOutcome::MissingInvoiceNumber { supplier } => {
            anyhow::bail!(
                "Extraction for {} carries no invoice number; nothing to merge against.",
                supplier.name
            );
        }
        ReconcileOutcome::NoExistingInvoice { supplier } => {
            println!(
                "{} No duplicate on file for {}; nothing to merge.",
                style("✓").green(),
                supplier.name
            );
        }
        ReconcileOutcome::Merged {
            supplier,
            preview,
            invoice,
            line_items,
        } => {
            println!(
                "{} Merged into invoice {} ({}): {} items, {} {} incl. VAT",
                style("✓").green(),
                invoice.invoice_number,
                supplier.name,
                line_items.len(),
                invoice.total_incl_vat,
                invoice.currency
            );
            println!(
                "  duplicates folded: {}  new items: {}",
                preview.duplicate_line_items, preview.new_line_items
            );
        }
    }

    Ok(())
}
