//! Random key stream driven through a linear hash table.

use linhash_common::config::LinHashConfig;
use linhash_common::page::Key;
use linhash_common::{LinHashError, Result};
use linhash_index::{LinearHashTable, TableReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of one workload run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSummary {
    /// Seed the key stream was drawn with.
    pub seed: u64,
    /// Number of insert calls issued.
    pub keys_inserted: u64,
    /// Largest key that could be drawn.
    pub max_key: Key,
    /// Cost threshold used for every insert.
    pub cost_max: f64,
    /// Wall-clock time spent inserting, in milliseconds.
    pub elapsed_ms: u64,
    /// Final table statistics.
    pub report: TableReport,
}

/// Inserts `2^log2_keys` uniformly drawn keys and reports the final table.
///
/// With `verify`, the table's invariants and the membership of every drawn
/// key are checked after the stream completes.
pub fn run(config: &LinHashConfig, verify: bool) -> Result<(LinearHashTable, WorkloadSummary)> {
    config.validate()?;

    let seed = config.workload.seed.unwrap_or_else(rand::random);
    let key_count = config.workload.key_count();
    let max_key = config.workload.max_key;
    let cost_max = config.index.cost_max;

    tracing::info!(
        keys = key_count,
        cost_max,
        page_capacity = config.index.page_capacity,
        seed,
        "starting workload"
    );

    let mut table = LinearHashTable::new(config.index.clone())?;
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Instant::now();

    for i in 0..key_count {
        let key = rng.gen_range(0..=max_key);
        table.insert(key, cost_max)?;

        if (i + 1).is_power_of_two() && i + 1 >= 1024 {
            tracing::debug!(
                inserted = i + 1,
                buckets = table.bucket_count(),
                average_cost = table.average_cost(),
                "progress"
            );
        }
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;

    if verify {
        table.check_invariants()?;
        verify_membership(&table, seed, key_count, max_key)?;
        tracing::info!("verification passed");
    }

    let summary = WorkloadSummary {
        seed,
        keys_inserted: key_count,
        max_key,
        cost_max,
        elapsed_ms,
        report: table.report(),
    };

    tracing::info!(
        buckets = summary.report.bucket_count,
        average_cost = summary.report.average_cost,
        mean_cost = summary.report.mean_cost,
        elapsed_ms,
        "workload complete"
    );

    Ok((table, summary))
}

/// Replays the key stream and checks that every key is stored.
fn verify_membership(
    table: &LinearHashTable,
    seed: u64,
    key_count: u64,
    max_key: Key,
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..key_count {
        let key = rng.gen_range(0..=max_key);
        if !table.contains(key) {
            return Err(LinHashError::InvariantViolation(format!(
                "inserted key {} not found",
                key
            )));
        }
    }
    Ok(())
}
