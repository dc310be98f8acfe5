//! Line-item comparison and merge-preview computation.
//!
//! This is a preview step consumed by a human-facing review dialog before any
//! mutation: cheap, deterministic, side-effect-free. It never auto-decides to
//! discard data; any numeric discrepancy is routed to `MergeQuantities` for
//! explicit operator review.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::invoice::{ExtractedLineItem, InvoiceLineItem};

use super::patterns::{PRODUCT_PUNCTUATION, WHITESPACE};

/// What the merge would do with a duplicated line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeAction {
    /// New item is numerically identical to the stored one; nothing to add.
    KeepExisting,
    /// Quantities and totals differ and would be merged additively.
    MergeQuantities,
}

/// A pairing of a stored line item with an incoming one referring to the
/// same product.
#[derive(Debug, Clone, Serialize)]
pub struct LineItemComparison {
    /// The stored line item.
    pub existing: InvoiceLineItem,
    /// The incoming extracted line item.
    pub new: ExtractedLineItem,
    /// Always true; comparisons record only items considered duplicates.
    pub is_duplicate: bool,
    /// Required merge action.
    pub action: MergeAction,
}

/// Three-number summary plus per-item comparisons, shown to the reviewer
/// before committing a merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergePreview {
    /// Item count after a merge: existing + (new - duplicates).
    pub total_line_items: usize,
    /// Incoming items that duplicate a stored item.
    pub duplicate_line_items: usize,
    /// Incoming items with no stored counterpart.
    pub new_line_items: usize,
    /// Per-duplicate comparison detail.
    pub comparisons: Vec<LineItemComparison>,
}

/// Normalize a product name for equality comparison: lowercase, strip all
/// punctuation, collapse whitespace.
pub fn normalize_product_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = PRODUCT_PUNCTUATION.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Pair incoming line items with stored ones referring to the same product.
///
/// Stored items are indexed by normalized product name; if the stored invoice
/// already contains duplicate normalized names, the last one wins (known
/// source edge case, kept as-is). Incoming items missing `product_name`,
/// `quantity`, or `unit_price` are skipped: partial OCR extractions are
/// expected and must degrade gracefully. Items with no stored counterpart are
/// omitted; they only show up in the preview's `new_line_items` count.
pub fn compare_line_items(
    existing_items: &[InvoiceLineItem],
    new_items: &[ExtractedLineItem],
) -> Vec<LineItemComparison> {
    let mut index: HashMap<String, &InvoiceLineItem> = HashMap::new();
    for item in existing_items {
        index.insert(normalize_product_name(&item.product_name), item);
    }

    let mut comparisons = Vec::new();
    for new_item in new_items {
        let (Some(name), Some(quantity), Some(unit_price)) = (
            new_item.product_name.as_deref(),
            new_item.quantity,
            new_item.unit_price,
        ) else {
            continue;
        };

        let Some(existing) = index.get(&normalize_product_name(name)) else {
            continue;
        };

        // Exact numeric equality: any difference, however small, forces a
        // merge decision.
        let action = if quantity == existing.quantity && unit_price == existing.unit_price {
            MergeAction::KeepExisting
        } else {
            MergeAction::MergeQuantities
        };

        comparisons.push(LineItemComparison {
            existing: (*existing).clone(),
            new: new_item.clone(),
            is_duplicate: true,
            action,
        });
    }

    comparisons
}

/// Aggregate comparisons into the reviewer-facing summary.
pub fn generate_merge_preview(
    existing_items: &[InvoiceLineItem],
    new_items: &[ExtractedLineItem],
) -> MergePreview {
    let comparisons = compare_line_items(existing_items, new_items);
    let duplicates = comparisons.len();

    MergePreview {
        total_line_items: existing_items.len() + new_items.len() - duplicates,
        duplicate_line_items: duplicates,
        new_line_items: new_items.len() - duplicates,
        comparisons,
    }
}
