//! Check command - duplicate detection and merge preview for one extraction.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use larder_core::{DuplicateCheckResult, ExtractedInvoice, MergePreview, Reconciler};

use super::{load_config, open_store};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Extracted invoice JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Store data directory (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row per line-item comparison)
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config, args.data_dir.as_deref());
    let reconciler = Reconciler::new(&store, config.reconcile.clone());

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let extracted: ExtractedInvoice = serde_json::from_str(&fs::read_to_string(&args.input)?)?;

    let raw_name = extracted.supplier_name.as_deref().unwrap_or("");
    let Some(supplier) = reconciler.resolve_supplier(raw_name)? else {
        println!(
            "{} No supplier match for {:?}; route to manual review.",
            style("!").yellow(),
            raw_name
        );
        return Ok(());
    };
    info!(supplier_id = %supplier.id, "supplier resolved");

    let Some(invoice_number) = extracted.invoice_number.as_deref() else {
        println!(
            "{} Extraction carries no invoice number; duplicate check skipped.",
            style("!").yellow()
        );
        return Ok(());
    };

    match reconciler.check_for_duplicate(&supplier.id, invoice_number)? {
        DuplicateCheckResult::NotDuplicate => {
            println!(
                "{} No duplicate: {} has no invoice {} on file.",
                style("✓").green(),
                supplier.name,
                invoice_number
            );
        }
        DuplicateCheckResult::Duplicate {
            existing,
            existing_line_items,
        } => {
            let preview = reconciler.preview(&existing_line_items, &extracted);
            let rendered = render_preview(&existing.id, &preview, args.format)?;

            if let Some(output_path) = &args.output {
                fs::write(output_path, &rendered)?;
                println!(
                    "{} Output written to {}",
                    style("✓").green(),
                    output_path.display()
                );
            } else {
                print!("{rendered}");
            }
        }
    }

    Ok(())
}

fn render_preview(
    invoice_id: &str,
    preview: &MergePreview,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(preview)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record([
                "product_name",
                "existing_quantity",
                "existing_unit_price",
                "new_quantity",
                "new_unit_price",
                "action",
            ])?;
            for comparison in &preview.comparisons {
                writer.write_record([
                    comparison.existing.product_name.clone(),
                    comparison.existing.quantity.to_string(),
                    comparison.existing.unit_price.to_string(),
                    comparison
                        .new
                        .quantity
                        .map(|q| q.to_string())
                        .unwrap_or_default(),
                    comparison
                        .new
                        .unit_price
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                    format!("{:?}", comparison.action),
                ])?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| anyhow::anyhow!("failed to flush CSV output: {e}"))?;
            Ok(String::from_utf8(bytes)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!(
                "{} Duplicate of stored invoice {}\n",
                style("!").yellow(),
                invoice_id
            ));
            out.push_str(&format!(
                "  items after merge: {}  duplicates: {}  new: {}\n",
                preview.total_line_items, preview.duplicate_line_items, preview.new_line_items
            ));
            for comparison in &preview.comparisons {
                out.push_str(&format!(
                    "  - {} ({} @ {}) <- {:?}\n",
                    comparison.existing.product_name,
                    comparison.existing.quantity,
                    comparison.existing.unit_price,
                    comparison.action
                ));
            }
            Ok(out)
        }
    }
}
