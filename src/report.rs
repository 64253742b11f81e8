//! Summary views over a segmented customer table

use crate::scoring::Score;
use crate::segment::{SegmentTable, SegmentedCustomer};
use std::collections::BTreeMap;

/// Number of customers per composite score, largest group first
pub fn score_counts(table: &SegmentTable) -> Vec<(Score, usize)> {
    let mut counts: BTreeMap<Score, usize> = BTreeMap::new();
    for row in table.iter() {
        *counts.entry(row.score).or_default() += 1;
    }

    sort_counts(counts)
}

/// Number of customers per action text, the undefined marker included
pub fn action_counts(table: &SegmentTable) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in table.iter() {
        *counts.entry(row.action.clone()).or_default() += 1;
    }

    sort_counts(counts)
}

/// Up to `limit` customers with the given score, highest value first
pub fn top_by_value<'a>(
    table: &'a SegmentTable,
    score: &Score,
    limit: usize,
) -> Vec<&'a SegmentedCustomer> {
    let mut rows: Vec<&SegmentedCustomer> = table.iter().filter(|row| row.score == *score).collect();
    rows.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    rows.truncate(limit);
    rows
}

// Ties keep key order, so output is stable across runs
fn sort_counts<K: Ord>(counts: BTreeMap<K, usize>) -> Vec<(K, usize)> {
    let mut sorted: Vec<(K, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}
