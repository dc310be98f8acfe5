//! In-memory store for tests and embedding.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::models::invoice::{Invoice, InvoiceLineItem};
use crate::models::supplier::Supplier;

use super::InvoiceStore;

#[derive(Default)]
struct Inner {
    suppliers: Vec<Supplier>,
    invoices: Vec<Invoice>,
    line_items: HashMap<String, Vec<InvoiceLineItem>>,
    deleted_files: Vec<String>,
}

/// HashMap-backed store. Interior mutability behind a mutex so the store can
/// be shared by reference like any other `InvoiceStore`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a supplier.
    pub fn add_supplier(&self, supplier: Supplier) {
        self.inner.lock().unwrap().suppliers.push(supplier);
    }

    /// Seed an invoice with its line items.
    pub fn add_invoice(&self, invoice: Invoice, items: Vec<InvoiceLineItem>) {
        let mut inner = self.inner.lock().unwrap();
        inner.line_items.insert(invoice.id.clone(), items);
        inner.invoices.push(invoice);
    }

    /// Invoice ids whose source document was deleted (for assertions).
    pub fn deleted_files(&self) -> Vec<String> {
        self.inner.lock().unwrap().deleted_files.clone()
    }

    fn locked(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

impl InvoiceStore for MemoryStore {
    fn find_invoice(
        &self,
        supplier_id: &str,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, StoreError> {
        let inner = self.locked()?;
        Ok(inner
            .invoices
            .iter()
            .find(|i| i.supplier_id == supplier_id && i.invoice_number == invoice_number)
            .cloned())
    }

    fn invoice_line_items(&self, invoice_id: &str) -> Result<Vec<InvoiceLineItem>, StoreError> {
        let inner = self.locked()?;
        Ok(inner.line_items.get(invoice_id).cloned().unwrap_or_default())
    }

    fn list_suppliers(&self) -> Result<Vec<Supplier>, StoreError> {
        Ok(self.locked()?.suppliers.clone())
    }

    fn save_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        let mut inner = self.locked()?;
        match inner.invoices.iter_mut().find(|i| i.id == invoice.id) {
            Some(stored) => *stored = invoice.clone(),
            None => inner.invoices.push(invoice.clone()),
        }
        Ok(())
    }

    fn save_line_items(
        &self,
        invoice_id: &str,
        items: &[InvoiceLineItem],
    ) -> Result<(), StoreError> {
        let mut inner = self.locked()?;
        inner
            .line_items
            .insert(invoice_id.to_string(), items.to_vec());
        Ok(())
    }

    fn delete_invoice_file(&self, invoice_id: &str) -> Result<(), StoreError> {
        let mut inner = self.locked()?;
        if !inner.invoices.iter().any(|i| i.id == invoice_id) {
            return Err(StoreError::UnknownInvoice(invoice_id.to_string()));
        }
        inner.deleted_files.push(invoice_id.to_string());
        Ok(())
    }
}
