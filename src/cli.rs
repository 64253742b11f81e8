//! Command-line interface definitions and argument parsing

use crate::config::{ColumnNames, FrequencyBasis, RfvConfig};
use crate::scoring::ActionBook;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

/// How to count purchase events per customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrequencyArg {
    /// Count transaction rows
    Rows,
    /// Count distinct order identifiers
    Orders,
}

impl From<FrequencyArg> for FrequencyBasis {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Rows => FrequencyBasis::Rows,
            FrequencyArg::Orders => FrequencyBasis::DistinctOrders,
        }
    }
}

/// RFV customer segmentation CLI: quartile grades and marketing actions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the transaction CSV file
    #[arg(short, long, default_value = "transactions.csv")]
    pub input: String,

    /// JSON run configuration (columns, reference_date, frequency_basis).
    /// Flags given on the command line override its fields
    #[arg(long)]
    pub config: Option<String>,

    /// JSON file mapping scores to marketing actions
    #[arg(short, long)]
    pub actions: Option<String>,

    /// Measure recency from this day (YYYY-MM-DD) instead of the latest purchase
    #[arg(short, long)]
    pub reference_date: Option<NaiveDate>,

    /// How purchase events are counted (rows when neither flag nor config sets it)
    #[arg(short, long, value_enum)]
    pub frequency: Option<FrequencyArg>,

    /// Input column names as comma-separated string
    /// Example: --columns "client,day,order,total"
    #[arg(short, long)]
    pub columns: Option<String>,

    /// Read the legacy ID_cliente,DiaCompra,CodigoCompra,ValorTotal headers
    #[arg(long, conflicts_with = "columns")]
    pub legacy_columns: bool,

    /// Rows shown in each table preview
    #[arg(short, long, default_value = "10")]
    pub top: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse column names from the columns string
    /// Expected format: "customer_id,purchase_date,order_id,line_total"
    pub fn parse_column_names(&self) -> anyhow::Result<ColumnNames> {
        if self.legacy_columns {
            return Ok(ColumnNames::legacy());
        }

        let Some(ref columns_str) = self.columns else {
            return Ok(ColumnNames::default());
        };

        let parts: Vec<&str> = columns_str.split(',').map(str::trim).collect();
        if parts.len() != 4 || parts.iter().any(|part| part.is_empty()) {
            anyhow::bail!(
                "Columns must be in format 'customer_id,purchase_date,order_id,line_total'"
            );
        }

        Ok(ColumnNames {
            customer_id: parts[0].to_string(),
            purchase_date: parts[1].to_string(),
            order_id: parts[2].to_string(),
            line_total: parts[3].to_string(),
        })
    }

    /// Build the pipeline configuration from the config file, if any, and the flags
    pub fn rfv_config(&self) -> anyhow::Result<RfvConfig> {
        let mut config = match self.config {
            Some(ref path) => RfvConfig::from_json_file(path)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path, e))?,
            None => RfvConfig::default(),
        };

        if self.legacy_columns || self.columns.is_some() {
            config.columns = self.parse_column_names()?;
        }
        if self.reference_date.is_some() {
            config.reference_date = self.reference_date;
        }
        if let Some(frequency) = self.frequency {
            config.frequency_basis = frequency.into();
        }

        Ok(config)
    }

    /// Load the action dictionary, or the built-in one when no file is given
    pub fn action_book(&self) -> anyhow::Result<ActionBook> {
        match self.actions {
            Some(ref path) => ActionBook::from_json_file(path)
                .map_err(|e| anyhow::anyhow!("Invalid action dictionary {}: {}", path, e)),
            None => Ok(ActionBook::default()),
        }
    }
}
