//! rfv-segment: RFV (Recency, Frequency, Value) customer segmentation
//!
//! This library aggregates a purchase log into per-customer recency, frequency
//! and value metrics, grades each metric against its quartiles, and maps the
//! combined three-letter score to a marketing action.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod report;
pub mod scoring;
pub mod segment;

// Re-export public items for easier access
pub use cli::Args;
pub use config::{ColumnNames, FrequencyBasis, RfvConfig};
pub use data::{
    aggregate, load_transactions_csv, transactions_from_frame, CustomerMetrics, RfvData,
    Transaction,
};
pub use error::RfvError;
pub use model::{classify, Cuts, Dimension, Direction, Grade, QuartileCuts};
pub use report::{action_counts, score_counts, top_by_value};
pub use scoring::{ActionBook, Score, UNDEFINED_ACTION};
pub use segment::{
    score_customers, segment_frame, segment_transactions, SegmentTable, SegmentedCustomer,
};

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, RfvError>;
