//! Configuration structures for reconciliation and the store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::invoice::Unit;
use crate::error::{LarderError, Result};

/// Main configuration for larder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LarderConfig {
    /// Reconciliation configuration.
    pub reconcile: ReconcileConfig,

    /// Store configuration.
    pub store: StoreConfig,
}

/// Reconciliation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// VAT rate percentage assumed for line items that carry no explicit
    /// rate when recomputing invoice totals.
    pub standard_vat_rate: Decimal,

    /// Unit of measure assigned to merged-in items that carry none.
    pub default_unit: Unit,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            standard_vat_rate: Decimal::new(21, 0),
            default_unit: Unit::Pieces,
        }
    }
}

/// Store configuration (used by the JSON-file store and the CLI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the JSON store collections.
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl LarderConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| LarderError::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
