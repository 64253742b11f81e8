//! Transaction loading and per-customer RFV aggregation using Polars

use crate::config::{ColumnNames, FrequencyBasis, RfvConfig};
use crate::error::RfvError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use log::info;
use ndarray::Array2;
use polars::prelude::*;
use std::path::Path;

/// Datetime layouts accepted for string purchase dates, tried in order
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// One purchase line from the input table
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub customer_id: String,
    pub purchase_date: NaiveDateTime,
    pub order_id: String,
    pub line_total: f64,
}

impl Transaction {
    pub fn new(
        customer_id: impl Into<String>,
        purchase_date: NaiveDateTime,
        order_id: impl Into<String>,
        line_total: f64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            purchase_date,
            order_id: order_id.into(),
            line_total,
        }
    }
}

/// Aggregated RFV metrics for a single customer
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerMetrics {
    pub customer_id: String,
    /// Whole days between the reference date and the last purchase
    pub recency: i64,
    /// Number of purchase events
    pub frequency: u64,
    /// Sum of line totals
    pub value: f64,
}

/// Aggregated customer table
#[derive(Debug, Clone)]
pub struct RfvData {
    /// One entry per distinct customer, ordered by customer id
    pub customers: Vec<CustomerMetrics>,
    /// Raw metrics matrix (n_customers, 3) in recency, frequency, value order
    pub raw_features: Array2<f64>,
    /// Date recency was measured from
    pub reference_date: NaiveDateTime,
}

impl RfvData {
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// Read a transaction CSV and validate it into typed rows
///
/// All columns are read as text so identifiers keep their exact spelling;
/// dates and amounts are then parsed by [`transactions_from_frame`].
pub fn load_transactions_csv<P: AsRef<Path>>(
    path: P,
    columns: &ColumnNames,
) -> crate::Result<Vec<Transaction>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    info!(
        "Read {} rows from {}",
        df.height(),
        path.as_ref().display()
    );

    transactions_from_frame(&df, columns)
}

/// Validate a transaction table and convert it into typed rows
///
/// # Arguments
/// * `df` - Table holding at least the four transaction columns
/// * `columns` - Names of those columns
///
/// # Returns
/// * One `Transaction` per row, or the first validation failure found
pub fn transactions_from_frame(
    df: &DataFrame,
    columns: &ColumnNames,
) -> crate::Result<Vec<Transaction>> {
    // Every required column must exist before any value is looked at
    for name in [
        &columns.customer_id,
        &columns.purchase_date,
        &columns.order_id,
        &columns.line_total,
    ] {
        column(df, name)?;
    }

    if df.height() == 0 {
        return Err(RfvError::EmptyDataset);
    }

    let customer_ids = text_column(df, &columns.customer_id)?;
    let purchase_dates = date_column(df, &columns.purchase_date)?;
    let order_ids = text_column(df, &columns.order_id)?;
    let line_totals = amount_column(df, &columns.line_total)?;

    let transactions = customer_ids
        .into_iter()
        .zip(purchase_dates)
        .zip(order_ids)
        .zip(line_totals)
        .map(|(((customer_id, purchase_date), order_id), line_total)| Transaction {
            customer_id,
            purchase_date,
            order_id,
            line_total,
        })
        .collect();

    Ok(transactions)
}

/// Parse a purchase date written as an ISO-8601 date, datetime or RFC 3339 timestamp
pub fn parse_purchase_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Reduce transactions to one metrics row per customer
///
/// # Arguments
/// * `transactions` - Full transaction snapshot
/// * `config` - Reference date override and frequency basis
///
/// # Returns
/// * `RfvData` with customers ordered by id and the raw metrics matrix
pub fn aggregate(transactions: &[Transaction], config: &RfvConfig) -> crate::Result<RfvData> {
    if transactions.is_empty() {
        return Err(RfvError::EmptyDataset);
    }

    // Sorting by customer then amount fixes the summation order of each
    // customer's line totals, so value does not depend on input row order
    let df = transaction_frame(transactions)?.sort(
        ["customer_id", "line_total"],
        SortMultipleOptions::default(),
    )?;

    let latest_purchase = df
        .column("purchase_ts")?
        .i64()?
        .max()
        .and_then(|ts| datetime_from_ticks(ts, TimeUnit::Microseconds))
        .ok_or(RfvError::EmptyDataset)?;

    let reference_date = match config.reference_date {
        Some(day) if latest_purchase.date() > day => {
            return Err(RfvError::ReferenceBeforeLastPurchase {
                reference: day.and_time(NaiveTime::MIN),
                last_purchase: latest_purchase,
            });
        }
        Some(day) => day.and_time(NaiveTime::MIN),
        None => latest_purchase,
    };

    let rfv_df = compute_rfv_features(df, config.frequency_basis)?;
    let customers = collect_customers(&rfv_df, |last| match config.reference_date {
        // An explicit reference day is compared on calendar dates, the
        // dataset maximum on full timestamps
        Some(day) => (day - last.date()).num_days(),
        None => (reference_date - last).num_days(),
    })?;

    let raw_features = Array2::from_shape_fn((customers.len(), 3), |(i, j)| {
        let customer = &customers[i];
        match j {
            0 => customer.recency as f64,
            1 => customer.frequency as f64,
            _ => customer.value,
        }
    });

    info!(
        "Aggregated {} transactions into {} customers (reference date {})",
        transactions.len(),
        customers.len(),
        reference_date
    );

    Ok(RfvData {
        customers,
        raw_features,
        reference_date,
    })
}

/// Typed transactions as a frame with purchase dates in Unix microseconds
fn transaction_frame(transactions: &[Transaction]) -> crate::Result<DataFrame> {
    let frame = df!(
        "customer_id" => transactions.iter().map(|t| t.customer_id.as_str()).collect::<Vec<_>>(),
        "purchase_ts" => transactions
            .iter()
            .map(|t| t.purchase_date.and_utc().timestamp_micros())
            .collect::<Vec<_>>(),
        "order_id" => transactions.iter().map(|t| t.order_id.as_str()).collect::<Vec<_>>(),
        "line_total" => transactions.iter().map(|t| t.line_total).collect::<Vec<_>>()
    )?;

    Ok(frame)
}

/// Group a transaction frame sorted by customer into last purchase, frequency and value
fn compute_rfv_features(df: DataFrame, basis: FrequencyBasis) -> crate::Result<DataFrame> {
    let frequency = match basis {
        FrequencyBasis::Rows => col("order_id").count(),
        FrequencyBasis::DistinctOrders => col("order_id").n_unique(),
    };

    // Stable grouping keeps the customer order and the per-customer amount order
    let rfv_df = df
        .lazy()
        .group_by_stable([col("customer_id")])
        .agg([
            col("purchase_ts").max().alias("last_purchase"),
            frequency.alias("frequency"),
            col("line_total").sum().alias("value"),
        ])
        .collect()?;

    Ok(rfv_df)
}

fn collect_customers(
    rfv_df: &DataFrame,
    recency_of: impl Fn(NaiveDateTime) -> i64,
) -> crate::Result<Vec<CustomerMetrics>> {
    let ids = rfv_df.column("customer_id")?.str()?;
    let last_purchases = rfv_df.column("last_purchase")?.i64()?;
    let frequencies = rfv_df.column("frequency")?.cast(&DataType::UInt64)?;
    let frequencies = frequencies.u64()?;
    let values = rfv_df.column("value")?.f64()?;

    ids.into_iter()
        .zip(last_purchases)
        .zip(frequencies)
        .zip(values)
        .enumerate()
        .map(|(row, (((id, last), frequency), value))| {
            let missing = |column: &str| RfvError::MissingValue {
                column: column.to_string(),
                row,
            };
            let last_purchase = last
                .and_then(|ts| datetime_from_ticks(ts, TimeUnit::Microseconds))
                .ok_or_else(|| missing("last_purchase"))?;

            Ok(CustomerMetrics {
                customer_id: id.ok_or_else(|| missing("customer_id"))?.to_string(),
                recency: recency_of(last_purchase),
                frequency: frequency.ok_or_else(|| missing("frequency"))?,
                value: value.ok_or_else(|| missing("value"))?,
            })
        })
        .collect()
}

fn column<'a>(df: &'a DataFrame, name: &str) -> crate::Result<&'a Series> {
    df.column(name).map_err(|_| RfvError::MissingColumn {
        column: name.to_string(),
    })
}

/// Read an identifier column of any type as strings
fn text_column(df: &DataFrame, name: &str) -> crate::Result<Vec<String>> {
    let series = column(df, name)?.cast(&DataType::String)?;

    series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.map(str::to_string).ok_or_else(|| RfvError::MissingValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

fn date_column(df: &DataFrame, name: &str) -> crate::Result<Vec<NaiveDateTime>> {
    let series = column(df, name)?;
    let missing = |row: usize| RfvError::MissingValue {
        column: name.to_string(),
        row,
    };

    match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let raw = value.ok_or_else(|| missing(row))?;
                parse_purchase_date(raw).ok_or_else(|| RfvError::InvalidDate {
                    row,
                    value: raw.to_string(),
                })
            })
            .collect(),
        DataType::Date => {
            // Physical representation is days since the Unix epoch
            let days = series.cast(&DataType::Int32)?;
            let days = days.i32()?;
            days.into_iter()
                .enumerate()
                .map(|(row, value)| {
                    let day = value.ok_or_else(|| missing(row))?;
                    DateTime::from_timestamp(i64::from(day) * 86_400, 0)
                        .map(|timestamp| timestamp.naive_utc())
                        .ok_or_else(|| RfvError::InvalidDate {
                            row,
                            value: day.to_string(),
                        })
                })
                .collect()
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let ticks = series.cast(&DataType::Int64)?;
            let ticks = ticks.i64()?;
            ticks
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    let tick = value.ok_or_else(|| missing(row))?;
                    datetime_from_ticks(tick, unit).ok_or_else(|| RfvError::InvalidDate {
                        row,
                        value: tick.to_string(),
                    })
                })
                .collect()
        }
        other => Err(RfvError::UnsupportedColumnType {
            column: name.to_string(),
            dtype: other.to_string(),
        }),
    }
}

fn datetime_from_ticks(ticks: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let per_second: i64 = match unit {
        TimeUnit::Nanoseconds => 1_000_000_000,
        TimeUnit::Microseconds => 1_000_000,
        TimeUnit::Milliseconds => 1_000,
    };
    let seconds = ticks.div_euclid(per_second);
    let nanos = ticks.rem_euclid(per_second) * (1_000_000_000 / per_second);

    DateTime::from_timestamp(seconds, nanos as u32).map(|timestamp| timestamp.naive_utc())
}

fn amount_column(df: &DataFrame, name: &str) -> crate::Result<Vec<f64>> {
    let series = column(df, name)?;
    let missing = |row: usize| RfvError::MissingValue {
        column: name.to_string(),
        row,
    };

    if series.dtype() == &DataType::String {
        return series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let raw = value.ok_or_else(|| missing(row))?;
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|amount| amount.is_finite())
                    .ok_or_else(|| RfvError::InvalidAmount {
                        row,
                        value: raw.to_string(),
                    })
            })
            .collect();
    }

    if !series.dtype().is_numeric() {
        return Err(RfvError::UnsupportedColumnType {
            column: name.to_string(),
            dtype: series.dtype().to_string(),
        });
    }

    let amounts = series.cast(&DataType::Float64)?;
    let amounts = amounts.f64()?;
    amounts
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let amount = value.ok_or_else(|| missing(row))?;
            if amount.is_finite() {
                Ok(amount)
            } else {
                Err(RfvError::InvalidAmount {
                    row,
                    value: amount.to_string(),
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn day(offset: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + chrono::Duration::days(offset)
    }

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "customer_id,purchase_date,order_id,line_total").unwrap();
        writeln!(file, "017850,2021-01-01,536365,15.30").unwrap();
        writeln!(file, "017850,2021-01-01,536365,20.34").unwrap();
        writeln!(file, "017850,2021-02-10,536366,11.10").unwrap();
        writeln!(file, "13047,2021-02-11T08:34:00,536367,22.00").unwrap();
        file
    }

    fn frame(dates: Series) -> DataFrame {
        DataFrame::new(vec![
            Series::new("customer_id", &[1i64, 2, 1]),
            dates,
            Series::new("order_id", &[10i64, 11, 12]),
            Series::new("line_total", &[5i32, 7, 9]),
        ])
        .unwrap()
    }

    #[test]
    fn test_load_transactions_csv() {
        let test_file = create_test_csv();

        let transactions = load_transactions_csv(test_file.path(), &ColumnNames::default()).unwrap();

        assert_eq!(transactions.len(), 4);
        // Identifiers keep their leading zeros
        assert_eq!(transactions[0].customer_id, "017850");
        assert_eq!(transactions[0].line_total, 15.30);
        assert_eq!(
            transactions[3].purchase_date,
            NaiveDate::from_ymd_opt(2021, 2, 11)
                .unwrap()
                .and_hms_opt(8, 34, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_load_legacy_headers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ID_cliente,DiaCompra,CodigoCompra,ValorTotal").unwrap();
        writeln!(file, "1,2021-06-01,100,49.9").unwrap();

        let transactions = load_transactions_csv(file.path(), &ColumnNames::legacy()).unwrap();
        assert_eq!(transactions, vec![Transaction::new("1", day(151), "100", 49.9)]);
    }

    #[test]
    fn test_missing_column() {
        let df = DataFrame::new(vec![
            Series::new("customer_id", &["a"]),
            Series::new("purchase_date", &["2021-01-01"]),
            Series::new("line_total", &[1.0f64]),
        ])
        .unwrap();

        let err = transactions_from_frame(&df, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, RfvError::MissingColumn { ref column } if column == "order_id"));
    }

    #[test]
    fn test_empty_table() {
        let df = DataFrame::new(vec![
            Series::new("customer_id", Vec::<&str>::new()),
            Series::new("purchase_date", Vec::<&str>::new()),
            Series::new("order_id", Vec::<&str>::new()),
            Series::new("line_total", Vec::<f64>::new()),
        ])
        .unwrap();

        let err = transactions_from_frame(&df, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, RfvError::EmptyDataset));
    }

    #[test]
    fn test_invalid_date_reports_row() {
        let df = frame(Series::new(
            "purchase_date",
            &["2021-01-01", "not a date", "2021-01-03"],
        ));

        let err = transactions_from_frame(&df, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, RfvError::InvalidDate { row: 1, ref value } if value == "not a date"));
    }

    #[test]
    fn test_missing_customer_id() {
        let df = DataFrame::new(vec![
            Series::new("customer_id", &[Some("a"), None]),
            Series::new("purchase_date", &["2021-01-01", "2021-01-02"]),
            Series::new("order_id", &["1", "2"]),
            Series::new("line_total", &[1.0f64, 2.0]),
        ])
        .unwrap();

        let err = transactions_from_frame(&df, &ColumnNames::default()).unwrap_err();
        assert!(
            matches!(err, RfvError::MissingValue { ref column, row: 1 } if column == "customer_id")
        );
    }

    #[test]
    fn test_non_numeric_amount() {
        let df = DataFrame::new(vec![
            Series::new("customer_id", &["a", "b"]),
            Series::new("purchase_date", &["2021-01-01", "2021-01-02"]),
            Series::new("order_id", &["1", "2"]),
            Series::new("line_total", &["12.5", "twelve"]),
        ])
        .unwrap();

        let err = transactions_from_frame(&df, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, RfvError::InvalidAmount { row: 1, .. }));
    }

    #[test]
    fn test_boolean_amount_is_unsupported() {
        let df = DataFrame::new(vec![
            Series::new("customer_id", &["a"]),
            Series::new("purchase_date", &["2021-01-01"]),
            Series::new("order_id", &["1"]),
            Series::new("line_total", &[true]),
        ])
        .unwrap();

        let err = transactions_from_frame(&df, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, RfvError::UnsupportedColumnType { .. }));
    }

    #[test]
    fn test_date_and_datetime_columns() {
        // 2021-01-01 is day 18628 since the Unix epoch
        let dates = Series::new("purchase_date", &[18628i32, 18629, 18630])
            .cast(&DataType::Date)
            .unwrap();
        let transactions = transactions_from_frame(&frame(dates), &ColumnNames::default()).unwrap();
        assert_eq!(transactions[2].purchase_date, day(2));
        assert_eq!(transactions[0].customer_id, "1");
        assert_eq!(transactions[1].line_total, 7.0);

        let millis = 18628i64 * 86_400_000;
        let datetimes = Series::new("purchase_date", &[millis, millis + 3_600_000, millis])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let transactions =
            transactions_from_frame(&frame(datetimes), &ColumnNames::default()).unwrap();
        assert_eq!(
            transactions[1].purchase_date,
            day(0) + chrono::Duration::hours(1)
        );
    }

    #[test]
    fn test_missing_purchase_date_in_each_dtype() {
        let is_missing_date = |err: RfvError| {
            matches!(err, RfvError::MissingValue { ref column, row: 1 } if column == "purchase_date")
        };

        let strings = Series::new("purchase_date", &[Some("2021-01-01"), None, Some("2021-01-03")]);
        let err = transactions_from_frame(&frame(strings), &ColumnNames::default()).unwrap_err();
        assert!(is_missing_date(err));

        let dates = Series::new("purchase_date", &[Some(18628i32), None, Some(18630)])
            .cast(&DataType::Date)
            .unwrap();
        let err = transactions_from_frame(&frame(dates), &ColumnNames::default()).unwrap_err();
        assert!(is_missing_date(err));

        let millis = 18628i64 * 86_400_000;
        let datetimes = Series::new("purchase_date", &[Some(millis), None, Some(millis)])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let err = transactions_from_frame(&frame(datetimes), &ColumnNames::default()).unwrap_err();
        assert!(is_missing_date(err));
    }

    #[test]
    fn test_missing_order_id() {
        let df = DataFrame::new(vec![
            Series::new("customer_id", &["a", "a"]),
            Series::new("purchase_date", &["2021-01-01", "2021-01-02"]),
            Series::new("order_id", &[Some("1"), None]),
            Series::new("line_total", &[1.0f64, 2.0]),
        ])
        .unwrap();

        let err = transactions_from_frame(&df, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, RfvError::MissingValue { ref column, row: 1 } if column == "order_id"));
    }

    #[test]
    fn test_parse_purchase_date_formats() {
        assert_eq!(parse_purchase_date("2021-01-03"), Some(day(2)));
        assert_eq!(
            parse_purchase_date("2021-01-03 12:00:00"),
            Some(day(2) + chrono::Duration::hours(12))
        );
        assert_eq!(
            parse_purchase_date("2021-01-03T00:00:00Z"),
            Some(day(2))
        );
        assert_eq!(parse_purchase_date("03/01/2021"), None);
    }

    #[test]
    fn test_aggregate_rfv_metrics() {
        let transactions = vec![
            Transaction::new("a", day(0), "o1", 100.0),
            Transaction::new("b", day(5), "o2", 120.0),
            Transaction::new("b", day(5), "o3", 80.0),
            Transaction::new("c", day(10), "o4", 50.0),
        ];

        let data = aggregate(&transactions, &RfvConfig::default()).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.reference_date, day(10));
        assert_eq!(
            data.customers[1],
            CustomerMetrics {
                customer_id: "b".to_string(),
                recency: 5,
                frequency: 2,
                value: 200.0,
            }
        );
        assert_eq!(data.raw_features.shape(), &[3, 3]);
        assert_eq!(data.raw_features.column(0).to_vec(), vec![10.0, 5.0, 0.0]);
        assert_eq!(data.raw_features.column(2).to_vec(), vec![100.0, 200.0, 50.0]);
    }

    #[test]
    fn test_frequency_basis() {
        let transactions = vec![
            Transaction::new("a", day(0), "o1", 10.0),
            Transaction::new("a", day(0), "o1", 15.0),
            Transaction::new("a", day(3), "o2", 5.0),
        ];

        let rows = aggregate(&transactions, &RfvConfig::default()).unwrap();
        assert_eq!(rows.customers[0].frequency, 3);

        let config = RfvConfig {
            frequency_basis: FrequencyBasis::DistinctOrders,
            ..RfvConfig::default()
        };
        let orders = aggregate(&transactions, &config).unwrap();
        assert_eq!(orders.customers[0].frequency, 2);
    }

    #[test]
    fn test_recency_uses_whole_days() {
        let transactions = vec![
            Transaction::new("a", day(0) + chrono::Duration::hours(20), "o1", 1.0),
            Transaction::new("b", day(1) + chrono::Duration::hours(8), "o2", 1.0),
        ];

        let data = aggregate(&transactions, &RfvConfig::default()).unwrap();
        // 12 hours apart rounds down to zero days
        assert_eq!(data.customers[0].recency, 0);
    }

    #[test]
    fn test_reference_date_override() {
        let transactions = vec![
            Transaction::new("a", day(0), "o1", 1.0),
            Transaction::new("b", day(4) + chrono::Duration::hours(15), "o2", 1.0),
        ];

        let config = RfvConfig {
            reference_date: Some(day(10).date()),
            ..RfvConfig::default()
        };
        let data = aggregate(&transactions, &config).unwrap();
        assert_eq!(data.customers[0].recency, 10);
        assert_eq!(data.customers[1].recency, 6);

        let config = RfvConfig {
            reference_date: Some(day(3).date()),
            ..RfvConfig::default()
        };
        let err = aggregate(&transactions, &config).unwrap_err();
        assert!(matches!(err, RfvError::ReferenceBeforeLastPurchase { .. }));
    }

    #[test]
    fn test_value_sum_ignores_row_order() {
        let mut transactions = vec![
            Transaction::new("a", day(0), "o1", 0.1),
            Transaction::new("a", day(1), "o2", 0.2),
            Transaction::new("a", day(2), "o3", 0.3),
            Transaction::new("b", day(2), "o4", 0.6),
        ];

        let forward = aggregate(&transactions, &RfvConfig::default()).unwrap();
        transactions.reverse();
        let reversed = aggregate(&transactions, &RfvConfig::default()).unwrap();

        assert_eq!(forward.customers, reversed.customers);
        assert_eq!(forward.raw_features, reversed.raw_features);
        assert!((forward.customers[0].value - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_empty() {
        let err = aggregate(&[], &RfvConfig::default()).unwrap_err();
        assert!(matches!(err, RfvError::EmptyDataset));
    }
}
