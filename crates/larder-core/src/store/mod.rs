//! Persistence collaborator boundary.
//!
//! The backing store is external to the reconciliation core; this trait is
//! the whole contract. Records are keyed by opaque string identifiers. The
//! store is assumed to provide at-least atomic single-record writes;
//! serializing concurrent uploads of the same (supplier, invoice number)
//! pair is the caller's responsibility.

pub mod json;
pub mod memory;

use crate::error::StoreError;
use crate::models::invoice::{Invoice, InvoiceLineItem};
use crate::models::supplier::Supplier;

/// External store operations consumed by reconciliation.
pub trait InvoiceStore {
    /// Look up an invoice by its natural duplicate key.
    fn find_invoice(
        &self,
        supplier_id: &str,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, StoreError>;

    /// Fetch all line items belonging to an invoice.
    fn invoice_line_items(&self, invoice_id: &str) -> Result<Vec<InvoiceLineItem>, StoreError>;

    /// List all known suppliers.
    fn list_suppliers(&self) -> Result<Vec<Supplier>, StoreError>;

    /// Create or update an invoice record.
    fn save_invoice(&self, invoice: &Invoice) -> Result<(), StoreError>;

    /// Replace the full line-item set of an invoice.
    ///
    /// Merge output is persisted as one logical unit: the invoice plus its
    /// complete item collection.
    fn save_line_items(
        &self,
        invoice_id: &str,
        items: &[InvoiceLineItem],
    ) -> Result<(), StoreError>;

    /// Delete the stored source document of an invoice, if any.
    ///
    /// Issued as a separate call when a merge replaces the file path; the
    /// merge computation itself never touches files.
    fn delete_invoice_file(&self, invoice_id: &str) -> Result<(), StoreError>;
}
