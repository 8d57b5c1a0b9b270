//! Page and bucket identifiers for the linear hashing index.

use serde::{Deserialize, Serialize};

/// Modeled page size in bytes (1 KB).
pub const PAGE_SIZE: usize = 1024;

/// Key stored in the index.
pub type Key = i64;

/// Size of a stored key in bytes.
pub const KEY_SIZE: usize = std::mem::size_of::<Key>();

/// Number of keys that fit in one page: 1024 / 8 = 128.
pub const DEFAULT_PAGE_CAPACITY: usize = PAGE_SIZE / KEY_SIZE;

/// Position of a bucket in the directory.
///
/// Buckets are numbered `0..p` without gaps, so the id doubles as the
/// directory index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BucketId(pub u64);

impl BucketId {
    /// Returns the bucket id as a directory index.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u64> for BucketId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BucketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bucket:{}", self.0)
    }
}
