//! Duplicate-invoice detection.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::invoice::{Invoice, InvoiceLineItem};
use crate::store::InvoiceStore;

/// Outcome of a duplicate check.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DuplicateCheckResult {
    /// No invoice with this (supplier, invoice number) pair is on file.
    NotDuplicate,
    /// An invoice with this pair exists; its line items are loaded eagerly
    /// because the caller always needs them for comparison.
    Duplicate {
        existing: Invoice,
        existing_line_items: Vec<InvoiceLineItem>,
    },
}

impl DuplicateCheckResult {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DuplicateCheckResult::Duplicate { .. })
    }
}

/// Check whether an invoice with this exact `(supplier_id, invoice_number)`
/// pair already exists.
///
/// Matching is exact at this layer; all fuzziness lives in the supplier
/// matcher that resolved `supplier_id` upstream.
pub fn check_for_duplicate<S: InvoiceStore + ?Sized>(
    store: &S,
    supplier_id: &str,
    invoice_number: &str,
) -> Result<DuplicateCheckResult> {
    match store.find_invoice(supplier_id, invoice_number)? {
        Some(existing) => {
            let existing_line_items = store.invoice_line_items(&existing.id)?;
            debug!(
                invoice_id = %existing.id,
                invoice_number,
                items = existing_line_items.len(),
                "duplicate invoice found"
            );
            Ok(DuplicateCheckResult::Duplicate {
                existing,
                existing_line_items,
            })
        }
        None => Ok(DuplicateCheckResult::NotDuplicate),
    }
}
