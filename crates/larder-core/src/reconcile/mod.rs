//! Invoice reconciliation: supplier resolution, duplicate detection,
//! line-item comparison, and merge execution.

pub mod compare;
pub mod duplicate;
pub mod merge;
pub mod patterns;
pub mod supplier;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::config::ReconcileConfig;
use crate::models::invoice::{ExtractedInvoice, Invoice, InvoiceLineItem};
use crate::models::supplier::Supplier;
use crate::store::InvoiceStore;

use compare::{generate_merge_preview, MergePreview};
use duplicate::{check_for_duplicate, DuplicateCheckResult};
use merge::{merge_invoices, MergeOptions};

/// Outcome of running the full reconciliation flow for one extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// The extracted supplier name resolved to no known supplier. Surfaced
    /// to a human; reconciliation never invents supplier records.
    UnresolvedSupplier,
    /// The extraction carried no invoice number; the duplicate key cannot be
    /// formed.
    MissingInvoiceNumber { supplier: Supplier },
    /// No invoice with this (supplier, invoice number) pair is on file; the
    /// intake pipeline should create it as usual.
    NoExistingInvoice { supplier: Supplier },
    /// A duplicate was found and merged; the updated records were persisted.
    Merged {
        supplier: Supplier,
        preview: MergePreview,
        invoice: Invoice,
        line_items: Vec<InvoiceLineItem>,
    },
}

/// Runs the documented flow end to end for one extraction: resolve supplier,
/// detect duplicate, compare line items, merge, persist.
///
/// One reconciliation runs at a time per (supplier, invoice number) pair;
/// serializing concurrent uploads of the same pair is the caller's job.
pub struct Reconciler<'a, S: InvoiceStore + ?Sized> {
    store: &'a S,
    config: ReconcileConfig,
}

impl<'a, S: InvoiceStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S, config: ReconcileConfig) -> Self {
        Self { store, config }
    }

    /// Resolve a raw extracted supplier name against the known suppliers.
    pub fn resolve_supplier(&self, raw_name: &str) -> Result<Option<Supplier>> {
        let candidates = self.store.list_suppliers()?;
        let matched = supplier::find_match(raw_name, &candidates).cloned();
        match &matched {
            Some(s) => debug!(supplier_id = %s.id, name = %s.name, "supplier resolved"),
            None => debug!(raw_name, "no supplier match"),
        }
        Ok(matched)
    }

    /// Check whether an invoice with this exact duplicate key is on file.
    pub fn check_for_duplicate(
        &self,
        supplier_id: &str,
        invoice_number: &str,
    ) -> Result<DuplicateCheckResult> {
        check_for_duplicate(self.store, supplier_id, invoice_number)
    }

    /// Compute the reviewer-facing merge preview without mutating anything.
    pub fn preview(
        &self,
        existing_items: &[InvoiceLineItem],
        extracted: &ExtractedInvoice,
    ) -> MergePreview {
        generate_merge_preview(existing_items, &extracted.line_items)
    }

    /// Merge a duplicate upload into the stored invoice and persist the
    /// result as one logical unit.
    ///
    /// When the merge replaces the source document path, the old document is
    /// deleted through the store before the updated invoice is written.
    pub fn apply_merge(
        &self,
        existing: &Invoice,
        existing_items: &[InvoiceLineItem],
        extracted: &ExtractedInvoice,
        options: MergeOptions,
    ) -> Result<(Invoice, Vec<InvoiceLineItem>)> {
        let outcome = merge_invoices(
            existing,
            existing_items,
            &extracted.line_items,
            extracted,
            options,
            &self.config,
        );

        let file_replaced = outcome.updated_invoice.file_path != existing.file_path;
        if file_replaced && existing.file_path.is_some() {
            self.store.delete_invoice_file(&existing.id)?;
        }

        self.store.save_invoice(&outcome.updated_invoice)?;
        self.store
            .save_line_items(&existing.id, &outcome.updated_line_items)?;

        info!(
            invoice_id = %existing.id,
            items = outcome.updated_line_items.len(),
            file_replaced,
            "merge persisted"
        );

        Ok((outcome.updated_invoice, outcome.updated_line_items))
    }

    /// Run the full flow for one extraction.
    pub fn reconcile(
        &self,
        extracted: &ExtractedInvoice,
        options: MergeOptions,
    ) -> Result<ReconcileOutcome> {
        let raw_name = extracted.supplier_name.as_deref().unwrap_or("");
        let Some(supplier) = self.resolve_supplier(raw_name)? else {
            warn!(raw_name, "unresolved supplier, routing to human review");
            return Ok(ReconcileOutcome::UnresolvedSupplier);
        };

        let Some(invoice_number) = extracted
            .invoice_number
            .as_deref()
            .filter(|n| !n.trim().is_empty())
        else {
            return Ok(ReconcileOutcome::MissingInvoiceNumber { supplier });
        };

        match self.check_for_duplicate(&supplier.id, invoice_number)? {
            DuplicateCheckResult::NotDuplicate => {
                Ok(ReconcileOutcome::NoExistingInvoice { supplier })
            }
            DuplicateCheckResult::Duplicate {
                existing,
                existing_line_items,
            } => {
                let preview = self.preview(&existing_line_items, extracted);
                let (invoice, line_items) =
                    self.apply_merge(&existing, &existing_line_items, extracted, options)?;
                Ok(ReconcileOutcome::Merged {
                    supplier,
                    preview,
                    invoice,
                    line_items,
                })
            }
        }
    }
}
