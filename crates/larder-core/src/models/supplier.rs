//! Supplier data model.

use serde::{Deserialize, Serialize};

/// A canonical supplier record.
///
/// The name is whatever a user entered; OCR-extracted names are noisy
/// variants that must resolve to this record. Reconciliation never creates
/// or mutates suppliers as a side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Opaque record identifier.
    pub id: String,

    /// Canonical display name.
    pub name: String,

    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Supplier {
    /// Create a supplier with just an id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            phone: None,
        }
    }
}
