//! Core library for restaurant back-office invoice reconciliation.
//!
//! This crate provides:
//! - Invoice, line-item, and supplier data models
//! - Supplier-name normalization and matching against known suppliers
//! - Duplicate-invoice detection keyed by (supplier, invoice number)
//! - Line-item comparison and merge-preview computation
//! - A merge planner that combines a duplicate upload into the stored invoice

pub mod error;
pub mod models;
pub mod reconcile;
pub mod store;

pub use error::{LarderError, Result, StoreError};
pub use models::config::{LarderConfig, ReconcileConfig};
pub use models::invoice::{
    ExtractedInvoice, ExtractedLineItem, Invoice, InvoiceLineItem, InvoiceStatus, Unit,
};
pub use models::supplier::Supplier;
pub use reconcile::compare::{
    compare_line_items, generate_merge_preview, LineItemComparison, MergeAction, MergePreview,
};
pub use reconcile::duplicate::{check_for_duplicate, DuplicateCheckResult};
pub use reconcile::merge::{merge_invoices, MergeOptions, MergeOutcome};
pub use reconcile::supplier::{clean, find_match, normalize_for_matching};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use store::{InvoiceStore, json::JsonStore, memory::MemoryStore};
