//! Page-access accounting.
//!
//! Every page touch made by the index is charged to an [`AccessStats`]
//! owned by the table. The running average cost, `ios / insertions` in
//! integer division, is what gates bucket splits.

use serde::{Deserialize, Serialize};

/// Page-access and insertion counters.
///
/// Both counters only grow; the average is taken over the whole lifetime of
/// the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessStats {
    /// Number of page accesses charged so far.
    ios: u64,
    /// Number of insert calls, including those that found a duplicate.
    insertions: u64,
}

impl AccessStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Charges one page access.
    #[inline]
    pub fn record_access(&mut self) {
        self.ios += 1;
    }

    /// Takes back one page access charged by a search that missed.
    #[inline]
    pub(crate) fn rollback_access(&mut self) {
        debug_assert!(self.ios > 0, "access rollback with no accesses charged");
        self.ios = self.ios.saturating_sub(1);
    }

    /// Counts one insert call.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Returns the number of page accesses.
    #[inline]
    pub fn ios(&self) -> u64 {
        self.ios
    }

    /// Returns the number of insert calls.
    #[inline]
    pub fn insertions(&self) -> u64 {
        self.insertions
    }

    /// Returns the average page accesses per insertion, truncated to a whole
    /// number of accesses, or 0 before the first insertion.
    ///
    /// This is the value compared against the cost threshold.
    pub fn average_cost(&self) -> f64 {
        self.ios.checked_div(self.insertions).unwrap_or(0) as f64
    }

    /// Returns the exact mean page accesses per insertion, or 0 before the
    /// first insertion.
    pub fn mean_cost(&self) -> f64 {
        if self.insertions == 0 {
            0.0
        } else {
            self.ios as f64 / self.insertions as f64
        }
    }

    /// Returns the counters accumulated since an earlier snapshot.
    pub fn since(&self, earlier: &AccessStats) -> AccessStats {
        AccessStats {
            ios: self.ios.saturating_sub(earlier.ios),
            insertions: self.insertions.saturating_sub(earlier.insertions),
        }
    }
}

impl std::fmt::Display for AccessStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} accesses / {} insertions (avg {:.3})",
            self.ios,
            self.insertions,
            self.mean_cost()
        )
    }
}
