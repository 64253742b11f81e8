//! End-to-end segmentation pipeline and the per-customer result table

use crate::config::RfvConfig;
use crate::data::{aggregate, transactions_from_frame, RfvData, Transaction};
use crate::model::{Dimension, Grade, QuartileCuts};
use crate::scoring::{ActionBook, Score};
use chrono::NaiveDateTime;
use log::info;
use polars::prelude::*;

/// One customer with metrics, grades, composite score and action
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedCustomer {
    pub customer_id: String,
    pub recency: i64,
    pub frequency: u64,
    pub value: f64,
    pub score: Score,
    pub action: String,
}

impl SegmentedCustomer {
    pub fn r_grade(&self) -> Grade {
        self.score.recency
    }

    pub fn f_grade(&self) -> Grade {
        self.score.frequency
    }

    pub fn v_grade(&self) -> Grade {
        self.score.value
    }
}

/// Complete result of one segmentation run
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentTable {
    /// One row per customer, ordered by customer id
    pub rows: Vec<SegmentedCustomer>,
    pub cuts: QuartileCuts,
    pub reference_date: NaiveDateTime,
}

impl SegmentTable {
    /// Output column names, in order
    pub const COLUMNS: [&'static str; 9] = [
        "customer_id",
        "recency",
        "frequency",
        "value",
        "r_grade",
        "f_grade",
        "v_grade",
        "score",
        "action",
    ];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentedCustomer> {
        self.rows.iter()
    }

    pub fn get(&self, customer_id: &str) -> Option<&SegmentedCustomer> {
        self.rows
            .binary_search_by(|row| row.customer_id.as_str().cmp(customer_id))
            .ok()
            .map(|index| &self.rows[index])
    }

    /// Build the output table with the columns listed in [`SegmentTable::COLUMNS`]
    pub fn to_dataframe(&self) -> crate::Result<DataFrame> {
        let grade_column = |grade: fn(&SegmentedCustomer) -> Grade| -> Vec<String> {
            self.rows.iter().map(|row| grade(row).to_string()).collect()
        };

        let frame = df!(
            "customer_id" => self.rows.iter().map(|row| row.customer_id.as_str()).collect::<Vec<_>>(),
            "recency" => self.rows.iter().map(|row| row.recency).collect::<Vec<_>>(),
            "frequency" => self.rows.iter().map(|row| row.frequency).collect::<Vec<_>>(),
            "value" => self.rows.iter().map(|row| row.value).collect::<Vec<_>>(),
            "r_grade" => grade_column(SegmentedCustomer::r_grade),
            "f_grade" => grade_column(SegmentedCustomer::f_grade),
            "v_grade" => grade_column(SegmentedCustomer::v_grade),
            "score" => self.rows.iter().map(|row| row.score.to_string()).collect::<Vec<_>>(),
            "action" => self.rows.iter().map(|row| row.action.as_str()).collect::<Vec<_>>()
        )?;

        Ok(frame)
    }
}

/// Grade aggregated customers and attach their actions
///
/// # Arguments
/// * `rfv_data` - Aggregated customer table
/// * `cuts` - Quartile cuts fitted on the same table
/// * `actions` - Score to action dictionary
pub fn score_customers(
    rfv_data: &RfvData,
    cuts: &QuartileCuts,
    actions: &ActionBook,
) -> Vec<SegmentedCustomer> {
    rfv_data
        .customers
        .iter()
        .map(|customer| {
            let score = Score::new(
                cuts.grade(Dimension::Recency, customer.recency as f64),
                cuts.grade(Dimension::Frequency, customer.frequency as f64),
                cuts.grade(Dimension::Value, customer.value),
            );

            SegmentedCustomer {
                customer_id: customer.customer_id.clone(),
                recency: customer.recency,
                frequency: customer.frequency,
                value: customer.value,
                score,
                action: actions.action_for(&score).to_string(),
            }
        })
        .collect()
}

/// Run aggregation, quartile fitting, grading and action lookup over transactions
///
/// # Arguments
/// * `transactions` - Full transaction snapshot
/// * `config` - Reference date override and frequency basis
/// * `actions` - Score to action dictionary
///
/// # Returns
/// * A fully populated `SegmentTable`, or the first input error
pub fn segment_transactions(
    transactions: &[Transaction],
    config: &RfvConfig,
    actions: &ActionBook,
) -> crate::Result<SegmentTable> {
    let rfv_data = aggregate(transactions, config)?;
    let cuts = QuartileCuts::fit(&rfv_data)?;
    let rows = score_customers(&rfv_data, &cuts, actions);

    info!("Segmented {} customers", rows.len());

    Ok(SegmentTable {
        rows,
        cuts,
        reference_date: rfv_data.reference_date,
    })
}

/// Validate a transaction table and segment it
pub fn segment_frame(
    df: &DataFrame,
    config: &RfvConfig,
    actions: &ActionBook,
) -> crate::Result<SegmentTable> {
    let transactions = transactions_from_frame(df, &config.columns)?;
    segment_transactions(&transactions, config, actions)
}
