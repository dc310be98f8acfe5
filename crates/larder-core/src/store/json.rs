//! JSON-file-backed store.
//!
//! One JSON document per collection under a data directory:
//! `suppliers.json`, `invoices.json`, `line_items.json`. Suits the CLI and
//! small single-operator deployments; every call reads and rewrites the
//! affected collection.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;
use crate::models::invoice::{Invoice, InvoiceLineItem};
use crate::models::supplier::Supplier;

use super::InvoiceStore;

const SUPPLIERS_FILE: &str = "suppliers.json";
const INVOICES_FILE: &str = "invoices.json";
const LINE_ITEMS_FILE: &str = "line_items.json";

/// Store persisting collections as JSON files under `data_dir`.
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn load<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StoreError> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.data_dir.join(file);
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content)?;
        debug!(file = %path.display(), "wrote store collection");
        Ok(())
    }

    fn load_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        self.load(INVOICES_FILE)
    }

    fn load_line_items(&self) -> Result<HashMap<String, Vec<InvoiceLineItem>>, StoreError> {
        self.load(LINE_ITEMS_FILE)
    }
}

impl InvoiceStore for JsonStore {
    fn find_invoice(
        &self,
        supplier_id: &str,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, StoreError> {
        Ok(self
            .load_invoices()?
            .into_iter()
            .find(|i| i.supplier_id == supplier_id && i.invoice_number == invoice_number))
    }

    fn invoice_line_items(&self, invoice_id: &str) -> Result<Vec<InvoiceLineItem>, StoreError> {
        Ok(self
            .load_line_items()?
            .remove(invoice_id)
            .unwrap_or_default())
    }

    fn list_suppliers(&self) -> Result<Vec<Supplier>, StoreError> {
        self.load(SUPPLIERS_FILE)
    }

    fn save_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        let mut invoices = self.load_invoices()?;
        match invoices.iter_mut().find(|i| i.id == invoice.id) {
            Some(stored) => *stored = invoice.clone(),
            None => invoices.push(invoice.clone()),
        }
        self.save(INVOICES_FILE, &invoices)
    }

    fn save_line_items(
        &self,
        invoice_id: &str,
        items: &[InvoiceLineItem],
    ) -> Result<(), StoreError> {
        let mut all = self.load_line_items()?;
        all.insert(invoice_id.to_string(), items.to_vec());
        self.save(LINE_ITEMS_FILE, &all)
    }

    fn delete_invoice_file(&self, invoice_id: &str) -> Result<(), StoreError> {
        let invoices = self.load_invoices()?;
        let invoice = invoices
            .iter()
            .find(|i| i.id == invoice_id)
            .ok_or_else(|| StoreError::UnknownInvoice(invoice_id.to_string()))?;

        if let Some(file_path) = &invoice.file_path {
            let path = Path::new(file_path);
            if path.exists() {
                fs::remove_file(path)?;
                debug!(file = %path.display(), "deleted invoice source document");
            }
        }
        Ok(())
    }
}
