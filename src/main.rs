//! rfv-segment: RFV customer segmentation CLI
//!
//! This is the main entrypoint that loads transactions, runs the segmentation
//! pipeline and prints the resulting tables and summaries.

use anyhow::Result;
use clap::Parser;
use rfv_segment::{
    action_counts, load_transactions_csv, score_counts, segment_transactions, top_by_value, Args,
    Grade, Score,
};
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    run_pipeline(&args)
}

/// Run the full segmentation pipeline and print the report
fn run_pipeline(args: &Args) -> Result<()> {
    println!("=== RFV Segmentation ===\n");

    let start_time = Instant::now();
    let config = args.rfv_config()?;
    let actions = args.action_book()?;

    // Step 1: Load transactions
    if args.verbose {
        println!("Step 1: Loading transactions");
        println!("  Input file: {}", args.input);
        println!("  Frequency basis: {:?}", config.frequency_basis);
    }

    let data_start = Instant::now();
    let transactions = load_transactions_csv(&args.input, &config.columns)?;
    let data_time = data_start.elapsed();

    println!("✓ Data loaded: {} transactions", transactions.len());
    if args.verbose {
        println!("  Loading time: {:.2}s", data_time.as_secs_f64());
    }

    // Step 2: Aggregate, grade and score
    let segment_start = Instant::now();
    let table = segment_transactions(&transactions, &config, &actions)?;
    let segment_time = segment_start.elapsed();

    println!("✓ Customers segmented: {}", table.len());
    println!("  Reference date: {}", table.reference_date);
    if args.verbose {
        println!("  Segmentation time: {:.2}s", segment_time.as_secs_f64());
    }

    // Step 3: Print tables and summaries
    println!("\n=== Quartile Cuts ===");
    print!("{}", table.cuts);

    println!("\n=== RFV Table ===");
    let frame = table.to_dataframe()?;
    println!("{}", frame.head(Some(args.top)));

    println!("\n=== Customers per Score ===");
    for (score, count) in score_counts(&table) {
        println!("{}: {}", score, count);
    }

    let best = Score::new(Grade::A, Grade::A, Grade::A);
    println!("\n=== Top {} {} Customers by Value ===", args.top, best);
    for row in top_by_value(&table, &best, args.top) {
        println!(
            "{}: recency={} frequency={} value={:.2}",
            row.customer_id, row.recency, row.frequency, row.value
        );
    }

    println!("\n=== Customers per Action ===");
    for (action, count) in action_counts(&table) {
        println!("{}: {}", count, action);
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
