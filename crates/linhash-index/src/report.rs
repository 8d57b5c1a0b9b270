//! Point-in-time statistics for a linear hash table.

use serde::{Deserialize, Serialize};

/// Snapshot of table shape and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableReport {
    /// Distinct keys stored.
    pub keys: u64,
    /// Number of buckets (`p`).
    pub bucket_count: u64,
    /// Expansion level (`t`).
    pub level: u32,
    /// Keys per page.
    pub page_capacity: usize,
    /// Total pages, primary and overflow.
    pub page_count: usize,
    /// Overflow pages only.
    pub overflow_pages: usize,
    /// Pages in the longest bucket chain.
    pub longest_chain: usize,
    /// Page accesses charged so far.
    pub ios: u64,
    /// Insert calls so far.
    pub insertions: u64,
    /// Average page accesses per insertion, truncated as the split threshold sees it.
    pub average_cost: f64,
    /// Exact mean page accesses per insertion.
    pub mean_cost: f64,
    /// Mean page fill, in percent of capacity.
    pub fill_percentage: f64,
}

impl std::fmt::Display for TableReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Keys stored:          {}", self.keys)?;
        writeln!(
            f,
            "Buckets:              {} (level {})",
            self.bucket_count, self.level
        )?;
        writeln!(
            f,
            "Pages:                {} ({} overflow, longest chain {})",
            self.page_count, self.overflow_pages, self.longest_chain
        )?;
        writeln!(
            f,
            "Page accesses:        {} over {} insertions",
            self.ios, self.insertions
        )?;
        writeln!(
            f,
            "Average access cost:  {} (exact {:.6})",
            self.average_cost, self.mean_cost
        )?;
        write!(f, "Mean page fill:       {:.2}%", self.fill_percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> TableReport {
        TableReport {
            keys: 10,
            bucket_count: 3,
            level: 1,
            page_capacity: 4,
            page_count: 4,
            overflow_pages: 1,
            longest_chain: 2,
            ios: 42,
            insertions: 12,
            average_cost: 3.0,
            mean_cost: 3.5,
            fill_percentage: 62.5,
        }
    }

    #[test]
    fn test_display() {
        let text = sample_report().to_string();
        assert!(text.contains("Keys stored:          10"));
        assert!(text.contains("Buckets:              3 (level 1)"));
        assert!(text.contains("Pages:                4 (1 overflow, longest chain 2)"));
        assert!(text.contains("Average access cost:  3 (exact 3.500000)"));
        assert!(text.ends_with("Mean page fill:       62.50%"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let original = sample_report();
        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: TableReport = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }
}
