//! Merge planning: combining a duplicate upload into the stored invoice.
//!
//! Pure over its inputs apart from generated ids and timestamps. Performs no
//! I/O and never mutates its arguments; callers persist the returned objects,
//! so a persistence failure leaves prior state untouched.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::models::config::ReconcileConfig;
use crate::models::invoice::{ExtractedInvoice, ExtractedLineItem, Invoice, InvoiceLineItem};

use super::compare::normalize_product_name;

/// Operator choices for one merge. Transient; never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Fold the new line items into the existing ones.
    pub merge_line_items: bool,
    /// Recompute invoice totals from the final line-item set.
    pub update_totals: bool,
    /// Keep the existing source document instead of the newly uploaded one.
    pub keep_existing_file: bool,
}

/// The updated invoice and full merged line-item collection, to be persisted
/// by the caller as a single logical unit.
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub updated_invoice: Invoice,
    pub updated_line_items: Vec<InvoiceLineItem>,
}

/// Merge a duplicate upload into the stored invoice.
///
/// With all options off this is a no-op beyond the `updated_at` bump, so
/// callers can route every reconciliation through one code path.
pub fn merge_invoices(
    existing_invoice: &Invoice,
    existing_items: &[InvoiceLineItem],
    new_items: &[ExtractedLineItem],
    new_invoice: &ExtractedInvoice,
    options: MergeOptions,
    config: &ReconcileConfig,
) -> MergeOutcome {
    let mut invoice = existing_invoice.clone();
    let mut items: Vec<InvoiceLineItem> = existing_items.to_vec();

    if options.merge_line_items {
        merge_line_items(&mut items, new_items, &invoice.id, config);
    }

    if options.update_totals {
        update_totals(&mut invoice, &items, config);
    }

    if !options.keep_existing_file {
        if let Some(file_path) = &new_invoice.file_path {
            // The replaced document is not deleted here; that is a separate
            // store call the orchestrating caller issues.
            invoice.file_path = Some(file_path.clone());
        }
    }

    invoice.updated_at = Utc::now();

    MergeOutcome {
        updated_invoice: invoice,
        updated_line_items: items,
    }
}

/// Fold new items into the existing collection.
///
/// Items whose normalized product name matches a stored item are merged
/// additively; the rest are appended as new rows owned by the existing
/// invoice. Items missing `product_name`, `quantity`, or `unit_price` are
/// skipped, never zero-defaulted.
fn merge_line_items(
    items: &mut Vec<InvoiceLineItem>,
    new_items: &[ExtractedLineItem],
    invoice_id: &str,
    config: &ReconcileConfig,
) {
    // Same index as the comparator: keyed by normalized name over the
    // existing items, last write wins on duplicate names.
    let mut index: HashMap<String, usize> = HashMap::new();
    for (pos, item) in items.iter().enumerate() {
        index.insert(normalize_product_name(&item.product_name), pos);
    }

    let now = Utc::now();
    let mut merged = 0usize;
    let mut appended = 0usize;

    for new_item in new_items {
        let (Some(name), Some(quantity), Some(unit_price)) = (
            new_item.product_name.as_deref(),
            new_item.quantity,
            new_item.unit_price,
        ) else {
            continue;
        };

        let incoming_total = new_item.total_price.unwrap_or(quantity * unit_price);

        match index.get(&normalize_product_name(name)) {
            Some(&pos) => {
                let item = &mut items[pos];
                item.quantity += quantity;
                item.total_price += incoming_total;
                // Unit price reflects the blended rate, not either original.
                item.unit_price = if item.quantity == Decimal::ZERO {
                    Decimal::ZERO
                } else {
                    (item.total_price / item.quantity).round_dp(4)
                };
                // Existing data always wins; backfill only unset fields.
                if item.description.is_none() {
                    item.description = new_item.description.clone();
                }
                if item.vat_rate.is_none() {
                    item.vat_rate = new_item.vat_rate;
                }
                item.updated_at = now;
                merged += 1;
            }
            None => {
                items.push(InvoiceLineItem {
                    id: Uuid::new_v4().to_string(),
                    invoice_id: invoice_id.to_string(),
                    product_name: name.to_string(),
                    description: new_item.description.clone(),
                    quantity,
                    unit: new_item.unit.unwrap_or(config.default_unit),
                    unit_price,
                    total_price: incoming_total,
                    vat_rate: Some(new_item.vat_rate.unwrap_or(Decimal::ZERO)),
                    created_at: now,
                    updated_at: now,
                });
                appended += 1;
            }
        }
    }

    debug!(merged, appended, "folded new line items");
}

/// Recompute invoice totals from scratch over the final line-item set.
///
/// Replaces the stored totals rather than adjusting them incrementally, so
/// totals stay consistent with the item set no matter how many merges have
/// run. Items without an explicit VAT rate are taxed at the configured
/// standard rate.
fn update_totals(invoice: &mut Invoice, items: &[InvoiceLineItem], config: &ReconcileConfig) {
    let mut total_excl = Decimal::ZERO;
    let mut total_vat = Decimal::ZERO;

    for item in items {
        let rate = item.vat_rate.unwrap_or(config.standard_vat_rate);
        total_excl += item.total_price;
        total_vat += (item.total_price * rate / Decimal::ONE_HUNDRED).round_dp(2);
    }

    invoice.total_excl_vat = total_excl.round_dp(2);
    invoice.vat_amount = total_vat.round_dp(2);
    invoice.total_incl_vat = invoice.total_excl_vat + invoice.vat_amount;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    use crate::models::invoice::{InvoiceStatus, Unit};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn invoice() -> Invoice {
        Invoice {
            id: "inv-1".to_string(),
            supplier_id: "s1".to_string(),
            invoice_number: "INV-100".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            total_excl_vat: dec("85"),
            vat_amount: dec("17.85"),
            total_incl_vat: dec("102.85"),
            discount_amount: Decimal::ZERO,
            currency: "EUR".to_string(),
            status: InvoiceStatus::Review,
            file_path: Some("/uploads/inv-100.pdf".to_string()),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stored(name: &str, quantity: &str, unit_price: &str, total: &str) -> InvoiceLineItem {
        InvoiceLineItem {
            id: format!("li-{name}"),
            invoice_id: "inv-1".to_string(),
            product_name: name.to_string(),
            description: None,
            quantity: dec(quantity),
            unit: Unit::Kilograms,
            unit_price: dec(unit_price),
            total_price: dec(total),
            vat_rate: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn incoming(name: &str, quantity: &str, unit_price: &str, total: Option<&str>) -> ExtractedLineItem {
        ExtractedLineItem {
            product_name: Some(name.to_string()),
            quantity: Some(dec(quantity)),
            unit_price: Some(dec(unit_price)),
            total_price: total.map(dec),
            ..Default::default()
        }
    }

    fn all_options() -> MergeOptions {
        MergeOptions {
            merge_line_items: true,
            update_totals: true,
            keep_existing_file: true,
        }
    }

    #[test]
    fn test_quantity_additivity() {
        let existing = vec![stored("Flour", "5", "2", "10")];
        let new_items = vec![incoming("Flour", "3", "2", Some("6"))];

        let outcome = merge_invoices(
            &invoice(),
            &existing,
            &new_items,
            &ExtractedInvoice::default(),
            all_options(),
            &ReconcileConfig::default(),
        );

        assert_eq!(outcome.updated_line_items.len(), 1);
        let item = &outcome.updated_line_items[0];
        assert_eq!(item.quantity, dec("8"));
        assert_eq!(item.total_price, dec("16"));
        assert_eq!(item.unit_price, dec("2"));
    }

    #[test]
    fn test_merge_derives_missing_total() {
        let existing = vec![stored("Flour", "5", "2", "10")];
        let new_items = vec![incoming("Flour", "3", "2", None)];

        let outcome = merge_invoices(
            &invoice(),
            &existing,
            &new_items,
            &ExtractedInvoice::default(),
            all_options(),
            &ReconcileConfig::default(),
        );

        assert_eq!(outcome.updated_line_items[0].total_price, dec("16"));
    }

    #[test]
    fn test_blended_unit_price() {
        let existing = vec![stored("Flour", "5", "2", "10")];
        let new_items = vec![incoming("Flour", "5", "4", Some("20"))];

        let outcome = merge_invoices(
            &invoice(),
            &existing,
            &new_items,
            &ExtractedInvoice::default(),
            all_options(),
            &ReconcileConfig::default(),
        );

        // 30 total over 10 units: neither 2 nor 4.
        assert_eq!(outcome.updated_line_items[0].unit_price, dec("3"));
    }

    #[test]
    fn test_existing_fields_win_on_backfill() {
        let mut with_description = stored("Flour", "5", "2", "10");
        with_description.description = Some("Type 550".to_string());
        with_description.vat_rate = Some(dec("9"));

        let new_items = vec![ExtractedLineItem {
            description: Some("Wheat flour".to_string()),
            vat_rate: Some(dec("21")),
            ..incoming("Flour", "3", "2", Some("6"))
        }];

        let outcome = merge_invoices(
            &invoice(),
            &[with_description],
            &new_items,
            &ExtractedInvoice::default(),
            all_options(),
            &ReconcileConfig::default(),
        );

        let item = &outcome.updated_line_items[0];
        assert_eq!(item.description.as_deref(), Some("Type 550"));
        assert_eq!(item.vat_rate, Some(dec("9")));
    }

    #[test]
    fn test_backfill_fills_unset_fields() {
        let existing = vec![stored("Flour", "5", "2", "10")];
        let new_items = vec![ExtractedLineItem {
            description: Some("Wheat flour".to_string()),
            vat_rate: Some(dec("21")),
            ..incoming("Flour", "3", "2", Some("6"))
        }];

        let outcome = merge_invoices(
            &invoice(),
            &existing,
            &new_items,
            &ExtractedInvoice::default(),
            all_options(),
            &ReconcileConfig::default(),
        );

        let item = &outcome.updated_line_items[0];
        assert_eq!(item.description.as_deref(), Some("Wheat flour"));
        assert_eq!(item.vat_rate, Some(dec("21")));
    }

    #[test]
    fn test_unmatched_item_appended_with_defaults() {
        let existing = vec![stored("Flour", "5", "2", "10")];
        let new_items = vec![incoming("Sea Salt", "2", "1.2", None)];

        let outcome = merge_invoices(
            &invoice(),
            &existing,
            &new_items,
            &ExtractedInvoice::default(),
            all_options(),
            &ReconcileConfig::default(),
        );

        assert_eq!(outcome.updated_line_items.len(), 2);
        let appended = &outcome.updated_line_items[1];
        assert_eq!(appended.invoice_id, "inv-1");
        assert_eq!(appended.product_name, "Sea Salt");
        assert_eq!(appended.unit, Unit::Pieces);
        assert_eq!(appended.vat_rate, Some(Decimal::ZERO));
        assert_eq!(appended.total_price, dec("2.4"));
        assert!(!appended.id.is_empty());
        assert_ne!(appended.id, existing[0].id);
    }

    #[test]
    fn test_partial_new_items_skipped() {
        let existing = vec![stored("Flour", "5", "2", "10")];
        let new_items = vec![ExtractedLineItem {
            product_name: Some("Flour".to_string()),
            quantity: Some(dec("3")),
            unit_price: None,
            ..Default::default()
        }];

        let outcome = merge_invoices(
            &invoice(),
            &existing,
            &new_items,
            &ExtractedInvoice::default(),
            all_options(),
            &ReconcileConfig::default(),
        );

        assert_eq!(outcome.updated_line_items.len(), 1);
        assert_eq!(outcome.updated_line_items[0].quantity, dec("5"));
    }

    #[test]
    fn test_totals_recomputed_from_scratch() {
        // One item with an explicit rate, one without (falls back to the
        // configured standard rate).
        let mut taxed = stored("Flour", "5", "2", "10");
        taxed.vat_rate = Some(dec("9"));
        let existing = vec![taxed, stored("Olive Oil", "2", "10", "20")];

        let outcome = merge_invoices(
            &invoice(),
            &existing,
            &[],
            &ExtractedInvoice::default(),
            MergeOptions {
                merge_line_items: false,
                update_totals: true,
                keep_existing_file: true,
            },
            &ReconcileConfig::default(),
        );

        let inv = &outcome.updated_invoice;
        assert_eq!(inv.total_excl_vat, dec("30"));
        // 10 * 9% + 20 * 21% = 0.90 + 4.20
        assert_eq!(inv.vat_amount, dec("5.10"));
        assert_eq!(inv.total_incl_vat, dec("35.10"));
        assert!((inv.total_incl_vat - (inv.total_excl_vat + inv.vat_amount)).abs() < dec("0.01"));
    }

    #[test]
    fn test_file_path_replaced_unless_kept() {
        let new_invoice = ExtractedInvoice {
            file_path: Some("/uploads/new-scan.pdf".to_string()),
            ..Default::default()
        };

        let replaced = merge_invoices(
            &invoice(),
            &[],
            &[],
            &new_invoice,
            MergeOptions {
                merge_line_items: false,
                update_totals: false,
                keep_existing_file: false,
            },
            &ReconcileConfig::default(),
        );
        assert_eq!(
            replaced.updated_invoice.file_path.as_deref(),
            Some("/uploads/new-scan.pdf")
        );

        let kept = merge_invoices(
            &invoice(),
            &[],
            &[],
            &new_invoice,
            MergeOptions {
                merge_line_items: false,
                update_totals: false,
                keep_existing_file: true,
            },
            &ReconcileConfig::default(),
        );
        assert_eq!(
            kept.updated_invoice.file_path.as_deref(),
            Some("/uploads/inv-100.pdf")
        );
    }

    #[test]
    fn test_no_op_options_only_bump_timestamp() {
        let existing_invoice = invoice();
        let existing = vec![stored("Flour", "5", "2", "10")];
        let new_items = vec![incoming("Flour", "3", "2", Some("6"))];

        let outcome = merge_invoices(
            &existing_invoice,
            &existing,
            &new_items,
            &ExtractedInvoice::default(),
            MergeOptions {
                merge_line_items: false,
                update_totals: false,
                keep_existing_file: true,
            },
            &ReconcileConfig::default(),
        );

        assert_eq!(outcome.updated_line_items[0].quantity, dec("5"));
        assert_eq!(outcome.updated_invoice.total_excl_vat, dec("85"));
        assert!(outcome.updated_invoice.updated_at >= existing_invoice.updated_at);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let existing_invoice = invoice();
        let existing = vec![stored("Flour", "5", "2", "10")];
        let new_items = vec![incoming("Flour", "3", "2", Some("6"))];

        let _ = merge_invoices(
            &existing_invoice,
            &existing,
            &new_items,
            &ExtractedInvoice::default(),
            all_options(),
            &ReconcileConfig::default(),
        );

        assert_eq!(existing[0].quantity, dec("5"));
        assert_eq!(existing_invoice.total_excl_vat, dec("85"));
    }
}
