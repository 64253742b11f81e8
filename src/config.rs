//! Pipeline configuration: input column names, reference date and frequency basis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the four transaction columns in the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub customer_id: String,
    pub purchase_date: String,
    pub order_id: String,
    pub line_total: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            customer_id: "customer_id".to_string(),
            purchase_date: "purchase_date".to_string(),
            order_id: "order_id".to_string(),
            line_total: "line_total".to_string(),
        }
    }
}

impl ColumnNames {
    /// Headers used by the legacy purchase export (`ID_cliente`, `DiaCompra`, ...)
    pub fn legacy() -> Self {
        Self {
            customer_id: "ID_cliente".to_string(),
            purchase_date: "DiaCompra".to_string(),
            order_id: "CodigoCompra".to_string(),
            line_total: "ValorTotal".to_string(),
        }
    }
}

/// How purchase events are counted for the frequency dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBasis {
    /// One event per transaction row. A multi-line order counts once per line.
    #[default]
    Rows,
    /// One event per distinct order identifier.
    DistinctOrders,
}

/// Settings for one segmentation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfvConfig {
    pub columns: ColumnNames,
    /// Day recency is measured from. Defaults to the latest purchase in the data.
    pub reference_date: Option<NaiveDate>,
    pub frequency_basis: FrequencyBasis,
}

impl RfvConfig {
    /// Parse a JSON config; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
