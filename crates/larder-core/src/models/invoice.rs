//! Invoice and line-item data models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored invoice record.
///
/// `(supplier_id, invoice_number)` is the natural duplicate key. The backing
/// store does not enforce it as a uniqueness constraint; the duplicate
/// detector treats it as one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Opaque record identifier.
    pub id: String,

    /// Canonical supplier this invoice belongs to.
    pub supplier_id: String,

    /// Supplier-assigned invoice number.
    pub invoice_number: String,

    /// Date printed on the invoice.
    pub invoice_date: NaiveDate,

    /// Total before VAT.
    pub total_excl_vat: Decimal,

    /// Total VAT amount.
    pub vat_amount: Decimal,

    /// Total including VAT.
    pub total_incl_vat: Decimal,

    /// Discount applied across the invoice.
    #[serde(default)]
    pub discount_amount: Decimal,

    /// Currency code (default: EUR).
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Processing status.
    #[serde(default)]
    pub status: InvoiceStatus,

    /// Path to the scanned source document, if kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Free-form operator notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Record creation time.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Invoice processing status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Awaiting processing.
    #[default]
    Pending,
    /// Extraction or reconciliation in progress.
    Processing,
    /// Flagged for human review.
    Review,
    /// Approved for the books.
    Approved,
    /// Rejected by the operator.
    Rejected,
}

/// Unit of measure for a line item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Pieces.
    #[default]
    #[serde(rename = "pcs")]
    Pieces,
    /// Kilograms.
    #[serde(rename = "kg")]
    Kilograms,
    /// Grams.
    #[serde(rename = "g")]
    Grams,
    /// Liters.
    #[serde(rename = "l")]
    Liters,
    /// Milliliters.
    #[serde(rename = "ml")]
    Milliliters,
}

impl Unit {
    /// Parse a unit from extracted text, accepting common spellings.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let s = s.trim_end_matches('.');

        match s {
            "pcs" | "pc" | "piece" | "pieces" | "vnt" | "unit" | "units" => Some(Unit::Pieces),
            "kg" | "kilogram" | "kilograms" => Some(Unit::Kilograms),
            "g" | "gr" | "gram" | "grams" => Some(Unit::Grams),
            "l" | "ltr" | "liter" | "liters" | "litre" | "litres" => Some(Unit::Liters),
            "ml" | "milliliter" | "milliliters" => Some(Unit::Milliliters),
            _ => None,
        }
    }

    /// Format for display.
    pub fn display(&self) -> &'static str {
        match self {
            Unit::Pieces => "pcs",
            Unit::Kilograms => "kg",
            Unit::Grams => "g",
            Unit::Liters => "l",
            Unit::Milliliters => "ml",
        }
    }
}

/// One purchased product row on a stored invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Opaque record identifier.
    pub id: String,

    /// Owning invoice.
    pub invoice_id: String,

    /// Product name as extracted (free text).
    pub product_name: String,

    /// Optional longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Quantity purchased (> 0).
    pub quantity: Decimal,

    /// Unit of measure.
    #[serde(default)]
    pub unit: Unit,

    /// Price per unit.
    pub unit_price: Decimal,

    /// Total price for the row.
    pub total_price: Decimal,

    /// VAT rate as a percentage (e.g. 21). Unset when extraction did not
    /// produce one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<Decimal>,

    /// Record creation time.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A partial invoice as produced by the extraction collaborator.
///
/// Every field may be missing, zero, or implausible; OCR extraction is
/// explicitly unreliable. Reconciliation treats absent fields as "unknown",
/// never as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    /// Raw supplier block as read from the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,

    /// Invoice number, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Invoice date, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    /// Total before VAT, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_excl_vat: Option<Decimal>,

    /// VAT amount, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<Decimal>,

    /// Total including VAT, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_incl_vat: Option<Decimal>,

    /// Currency code, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Path to the uploaded source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Extracted line items.
    #[serde(default)]
    pub line_items: Vec<ExtractedLineItem>,
}

/// A partial line item as produced by the extraction collaborator.
///
/// Items missing `product_name`, `quantity`, or `unit_price` are skipped by
/// comparison and merge rather than defaulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedLineItem {
    /// Product name, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Description, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Quantity, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,

    /// Unit of measure, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    /// Unit price, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    /// Row total, if read. Derived as quantity x unit price when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,

    /// VAT rate percentage, if read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<Decimal>,
}

impl Invoice {
    /// Validate the invoice data and return any issues found.
    pub fn validate(&self, line_items: &[InvoiceLineItem]) -> Vec<String> {
        let mut issues = Vec::new();
        let tolerance = Decimal::new(1, 2);

        if self.invoice_number.is_empty() {
            issues.push("Missing invoice number".to_string());
        }

        if self.supplier_id.is_empty() {
            issues.push("Missing supplier".to_string());
        }

        if (self.total_incl_vat - (self.total_excl_vat + self.vat_amount)).abs() > tolerance {
            issues.push(format!(
                "Gross total ({}) differs from net + VAT ({})",
                self.total_incl_vat,
                self.total_excl_vat + self.vat_amount
            ));
        }

        for item in line_items {
            if item.quantity <= Decimal::ZERO {
                issues.push(format!(
                    "Line item '{}' has non-positive quantity",
                    item.product_name
                ));
            }

            if (item.total_price - item.quantity * item.unit_price).abs() > tolerance {
                issues.push(format!(
                    "Line item '{}' total ({}) differs from quantity x unit price ({})",
                    item.product_name,
                    item.total_price,
                    item.quantity * item.unit_price
                ));
            }
        }

        issues
    }
}
