//! Linear hashing common types, errors, and utilities.
//!
//! This crate provides shared definitions used across the index and its driver.

pub mod config;
pub mod error;
pub mod hash;
pub mod page;

pub use config::{IndexConfig, LinHashConfig, WorkloadConfig};
pub use error::{LinHashError, Result};
pub use hash::{hash_key, pow2};
pub use page::{BucketId, Key, DEFAULT_PAGE_CAPACITY, PAGE_SIZE};
