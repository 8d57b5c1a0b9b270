//! Bucket directory.
//!
//! Buckets are numbered `0..p` with no gaps: splits only append a bucket or
//! replace a chain in place. The directory is therefore a plain vector
//! indexed by [`BucketId`].

use crate::accounting::AccessStats;
use crate::page::PageChain;
use linhash_common::page::BucketId;
use linhash_common::{LinHashError, Result};

/// Ordered collection of bucket chains.
#[derive(Debug, Clone)]
pub struct BucketDirectory {
    /// Chain owned by each bucket, indexed by bucket id.
    buckets: Vec<PageChain>,
}

impl BucketDirectory {
    /// Creates a directory holding bucket 0 with an empty chain.
    pub fn new(page_capacity: usize) -> Self {
        Self {
            buckets: vec![PageChain::new(page_capacity)],
        }
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn len(&self) -> u64 {
        self.buckets.len() as u64
    }

    /// Returns true if the directory has no buckets. Never true for a live table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Adds a bucket at the end, returning its id.
    pub fn append(&mut self, chain: PageChain) -> BucketId {
        let id = BucketId(self.len());
        self.buckets.push(chain);
        id
    }

    /// Returns the chain owned by `id`.
    pub fn get(&self, id: BucketId) -> Result<&PageChain> {
        let bucket_count = self.len();
        self.buckets.get(id.index()).ok_or_else(|| {
            tracing::error!(bucket = %id, bucket_count, "directory lookup past the last bucket");
            LinHashError::BucketNotFound {
                index: id.0,
                bucket_count,
            }
        })
    }

    /// Returns the chain owned by `id` for modification.
    pub fn get_mut(&mut self, id: BucketId) -> Result<&mut PageChain> {
        let bucket_count = self.len();
        self.buckets.get_mut(id.index()).ok_or_else(|| {
            tracing::error!(bucket = %id, bucket_count, "directory lookup past the last bucket");
            LinHashError::BucketNotFound {
                index: id.0,
                bucket_count,
            }
        })
    }

    /// Installs `chain` as the chain of bucket `id` and releases the old one.
    ///
    /// Returns the number of pages released. Fails without modifying the
    /// directory if `id` is not an existing bucket.
    pub fn replace_at(
        &mut self,
        id: BucketId,
        chain: PageChain,
        stats: &mut AccessStats,
    ) -> Result<usize> {
        let bucket_count = self.len();
        let slot = self
            .buckets
            .get_mut(id.index())
            .ok_or(LinHashError::BucketOutOfRange {
                index: id.0,
                bucket_count,
            })?;

        let old = std::mem::replace(slot, chain);
        Ok(old.release(stats))
    }

    /// Iterates over every bucket in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BucketId, &PageChain)> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, chain)| (BucketId(i as u64), chain))
    }

    /// Returns the total number of pages across all buckets.
    pub fn page_count(&self) -> usize {
        self.buckets.iter().map(PageChain::page_count).sum()
    }
}
