//! Linear hash table controller.
//!
//! The table grows one bucket at a time. With `p` buckets at level `t`
//! (`2^t <= p < 2^(t+1)`), a key hashes to `k = h(key) mod 2^(t+1)`;
//! buckets `p..2^(t+1)` do not exist yet, so such a `k` falls back to its
//! image `k - 2^t`, the bucket that will be split to create it.
//!
//! ```text
//! t = 2, p = 6
//!
//!   split already        next to split     not yet split
//!   [0] [1]               [2] [3]           [4] [5]  <- images of 0 and 1
//! ```
//!
//! Every insertion updates the running average page-access cost, taken as
//! `ios / insertions` in integer division. When it exceeds the caller's
//! threshold, bucket `p - 2^t` is split: its keys are redistributed between
//! itself and a new bucket `p`.

use crate::accounting::AccessStats;
use crate::directory::BucketDirectory;
use crate::page::PageChain;
use crate::report::TableReport;
use linhash_common::config::{validate_cost_max, IndexConfig};
use linhash_common::hash::{hash_key, pow2};
use linhash_common::page::{BucketId, Key};
use linhash_common::{LinHashError, Result};
use std::collections::HashSet;

/// In-memory linear hash index over `i64` keys.
#[derive(Debug, Clone)]
pub struct LinearHashTable {
    /// Page capacity and default cost threshold.
    config: IndexConfig,
    /// Bucket chains.
    directory: BucketDirectory,
    /// Number of buckets (`p`).
    bucket_count: u64,
    /// Expansion level (`t`).
    level: u32,
    /// Distinct keys stored.
    len: u64,
    /// Page-access accounting.
    stats: AccessStats,
}

impl LinearHashTable {
    /// Creates an empty table with one bucket.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    /// Creates an empty table with the given page capacity and default cost threshold.
    pub fn with_page_capacity(page_capacity: usize) -> Result<Self> {
        Self::new(IndexConfig {
            page_capacity,
            ..IndexConfig::default()
        })
    }

    fn with_valid_config(config: IndexConfig) -> Self {
        Self {
            directory: BucketDirectory::new(config.page_capacity),
            config,
            bucket_count: 1,
            level: 0,
            len: 0,
            stats: AccessStats::new(),
        }
    }

    /// Resolves the bucket responsible for `key`.
    pub fn bucket_for(&self, key: Key) -> BucketId {
        let k = hash_key(key) % pow2(self.level + 1);
        if k < self.bucket_count {
            BucketId(k)
        } else {
            BucketId(k - pow2(self.level))
        }
    }

    /// Inserts `key` unless already present, then splits a bucket if the
    /// average access cost exceeds `cost_max`.
    ///
    /// Returns true if the key was newly stored. Duplicates still count as an
    /// insertion for the cost average. A `cost_max` that is negative or not
    /// finite is rejected before the table is touched.
    pub fn insert(&mut self, key: Key, cost_max: f64) -> Result<bool> {
        validate_cost_max(cost_max)?;

        let bucket = self.bucket_for(key);
        let chain = self.directory.get_mut(bucket)?;

        let inserted = if chain.search(key, &mut self.stats) {
            false
        } else {
            chain.insert(key, &mut self.stats);
            true
        };

        if inserted {
            self.len += 1;
        }
        self.stats.record_insertion();

        if self.stats.average_cost() > cost_max {
            self.expand()?;
        }

        Ok(inserted)
    }

    /// Inserts `key` using the configured cost threshold.
    pub fn insert_default(&mut self, key: Key) -> Result<bool> {
        let cost_max = self.config.cost_max;
        self.insert(key, cost_max)
    }

    /// Looks up `key`, charging the page accesses of the walk.
    pub fn search(&mut self, key: Key) -> Result<bool> {
        let bucket = self.bucket_for(key);
        let chain = self.directory.get(bucket)?;
        Ok(chain.search(key, &mut self.stats))
    }

    /// Returns true if `key` is stored. Charges no accesses.
    pub fn contains(&self, key: Key) -> bool {
        self.directory
            .get(self.bucket_for(key))
            .is_ok_and(|chain| chain.contains(key))
    }

    /// Splits bucket `p - 2^t` into itself and a new bucket `p`.
    ///
    /// Keys whose hash modulo `2^(t+1)` still equals the split bucket are
    /// compacted into a fresh chain; the rest move to the new bucket.
    /// Returns the id of the new bucket.
    pub fn expand(&mut self) -> Result<BucketId> {
        let page_capacity = self.config.page_capacity;
        let address_space = pow2(self.level + 1);
        let new_bucket = BucketId(self.bucket_count);
        let split_bucket = BucketId(self.bucket_count - pow2(self.level));

        // Appending the new bucket.
        self.stats.record_access();

        let mut stayed = PageChain::new(page_capacity);
        let mut moved = PageChain::new(page_capacity);

        let chain = self.directory.get(split_bucket)?;
        self.stats.record_access();
        for page in chain.pages() {
            for &key in page.keys() {
                if hash_key(key) % address_space == split_bucket.0 {
                    stayed.insert(key, &mut self.stats);
                } else {
                    moved.insert(key, &mut self.stats);
                }
            }
            self.stats.record_access();
        }

        let moved_keys = moved.len();
        let appended = self.directory.append(moved);
        debug_assert_eq!(appended, new_bucket);
        let released = self
            .directory
            .replace_at(split_bucket, stayed, &mut self.stats)?;

        self.bucket_count += 1;
        if self.bucket_count == address_space {
            self.level += 1;
            tracing::debug!(
                level = self.level,
                bucket_count = self.bucket_count,
                "expansion level advanced"
            );
        }

        tracing::debug!(
            split = %split_bucket,
            new = %new_bucket,
            moved_keys,
            released_pages = released,
            bucket_count = self.bucket_count,
            "split bucket"
        );

        Ok(new_bucket)
    }

    /// Returns the number of buckets (`p`).
    #[inline]
    pub fn bucket_count(&self) -> u64 {
        self.bucket_count
    }

    /// Returns the expansion level (`t`).
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns the number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if no keys are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the configuration the table was built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Returns the access counters.
    pub fn stats(&self) -> &AccessStats {
        &self.stats
    }

    /// Returns the running average page accesses per insertion, truncated
    /// the way the split threshold sees it.
    pub fn average_cost(&self) -> f64 {
        self.stats.average_cost()
    }

    /// Returns the exact mean page accesses per insertion.
    pub fn mean_cost(&self) -> f64 {
        self.stats.mean_cost()
    }

    /// Returns the chain of bucket `id`.
    pub fn bucket(&self, id: BucketId) -> Result<&PageChain> {
        self.directory.get(id)
    }

    /// Iterates over every bucket in id order.
    pub fn buckets(&self) -> impl Iterator<Item = (BucketId, &PageChain)> {
        self.directory.iter()
    }

    /// Returns the total number of pages.
    pub fn page_count(&self) -> usize {
        self.directory.page_count()
    }

    /// Returns the mean page fill across all pages, in percent of capacity.
    pub fn fill_percentage(&self) -> f64 {
        let (sum, pages) = self
            .directory
            .iter()
            .flat_map(|(_, chain)| chain.pages())
            .fold((0.0, 0usize), |(sum, pages), page| {
                (sum + page.fill_percentage(), pages + 1)
            });

        if pages == 0 {
            0.0
        } else {
            sum / pages as f64
        }
    }

    /// Captures the table's current shape and cost.
    pub fn report(&self) -> TableReport {
        let page_count = self.page_count();
        let longest_chain = self
            .directory
            .iter()
            .map(|(_, chain)| chain.page_count())
            .max()
            .unwrap_or(0);

        TableReport {
            keys: self.len,
            bucket_count: self.bucket_count,
            level: self.level,
            page_capacity: self.config.page_capacity,
            page_count,
            overflow_pages: page_count - self.directory.len() as usize,
            longest_chain,
            ios: self.stats.ios(),
            insertions: self.stats.insertions(),
            average_cost: self.stats.average_cost(),
            mean_cost: self.stats.mean_cost(),
            fill_percentage: self.fill_percentage(),
        }
    }

    /// Verifies the structural invariants of the table.
    ///
    /// Checks the level bound, the directory size, that every non-tail page
    /// is full, that every key lives in the bucket it addresses to, and that
    /// no key is stored twice.
    pub fn check_invariants(&self) -> Result<()> {
        let lower = pow2(self.level);
        let upper = pow2(self.level + 1);
        if self.bucket_count < lower || self.bucket_count >= upper {
            return Err(LinHashError::InvariantViolation(format!(
                "bucket count {} outside [{}, {}) at level {}",
                self.bucket_count, lower, upper, self.level
            )));
        }

        if self.directory.len() != self.bucket_count {
            return Err(LinHashError::InvariantViolation(format!(
                "directory holds {} buckets, expected {}",
                self.directory.len(),
                self.bucket_count
            )));
        }

        let mut total = 0u64;
        for (id, chain) in self.directory.iter() {
            if let Some(page) = chain.first_underfilled() {
                return Err(LinHashError::InvariantViolation(format!(
                    "{} page {} is not full but is followed by another page",
                    id, page
                )));
            }

            let mut seen = HashSet::with_capacity(chain.len());
            for key in chain.keys() {
                let expected = self.bucket_for(key);
                if expected != id {
                    return Err(LinHashError::InvariantViolation(format!(
                        "key {} stored in {} but addresses to {}",
                        key, id, expected
                    )));
                }
                if !seen.insert(key) {
                    return Err(LinHashError::InvariantViolation(format!(
                        "key {} stored twice in {}",
                        key, id
                    )));
                }
            }
            total += seen.len() as u64;
        }

        if total != self.len {
            return Err(LinHashError::InvariantViolation(format!(
                "{} keys stored, expected {}",
                total, self.len
            )));
        }

        Ok(())
    }
}

impl Default for LinearHashTable {
    fn default() -> Self {
        Self::with_valid_config(IndexConfig::default())
    }
}
