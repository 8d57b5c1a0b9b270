//! Linear hashing index.
//!
//! This crate provides:
//! - Fixed-capacity pages with lazily chained overflow pages
//! - A bucket directory that grows one bucket per split
//! - The linear hash table: addressing, duplicate-free insertion, search, and splits
//! - Page-access accounting whose running average cost drives splits
//! - Table reports and an invariant checker

mod accounting;
mod directory;
mod page;
mod report;
mod table;

pub use accounting::AccessStats;
pub use directory::BucketDirectory;
pub use page::{Page, PageChain};
pub use report::TableReport;
pub use table::LinearHashTable;
