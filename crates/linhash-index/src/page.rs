//! Fixed-capacity key pages and per-bucket overflow chains.
//!
//! Each bucket owns one [`PageChain`]: its primary page followed by any
//! overflow pages. Pages fill strictly in order, so every page except the
//! tail is full.
//!
//! ```text
//! bucket ─► [ primary: M keys ] ─► [ overflow: M keys ] ─► [ tail: <= M keys ]
//! ```
//!
//! Page touches are charged to the caller's [`AccessStats`]:
//! - insert: 1 to enter the chain, 1 per page boundary crossed, 1 per new page
//! - search: 1 to enter, 1 per page boundary crossed (including off the tail),
//!   minus 1 when the key is not found
//! - release: 1 per page freed

use crate::accounting::AccessStats;
use linhash_common::page::Key;

/// A fixed-capacity block of keys.
#[derive(Debug, Clone)]
pub struct Page {
    /// Keys in insertion order.
    keys: Vec<Key>,
    /// Maximum number of keys.
    capacity: usize,
}

impl Page {
    /// Creates an empty page.
    pub fn new(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the keys held by this page.
    #[inline]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns the number of keys held.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the page holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the page capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if no more keys fit.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.capacity
    }

    /// Returns the fill level as a percentage of capacity.
    pub fn fill_percentage(&self) -> f64 {
        (self.keys.len() as f64 * 100.0) / self.capacity as f64
    }

    /// Returns true if the page holds `key`.
    #[inline]
    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn push(&mut self, key: Key) {
        debug_assert!(!self.is_full());
        self.keys.push(key);
    }
}

/// A bucket's primary page plus its overflow pages.
///
/// The chain is never empty: the primary page exists even when it holds no keys.
#[derive(Debug, Clone)]
pub struct PageChain {
    /// Pages from head to tail.
    pages: Vec<Page>,
    /// Capacity of every page in the chain.
    page_capacity: usize,
}

impl PageChain {
    /// Creates a chain with a single empty primary page.
    pub fn new(page_capacity: usize) -> Self {
        Self {
            pages: vec![Page::new(page_capacity)],
            page_capacity,
        }
    }

    /// Appends `key` to the first page with spare room, chaining a new tail
    /// page when every page is full.
    ///
    /// Does not check for duplicates.
    pub fn insert(&mut self, key: Key, stats: &mut AccessStats) {
        stats.record_access();

        let mut current = 0;
        while self.pages[current].is_full() {
            if current + 1 == self.pages.len() {
                self.pages.push(Page::new(self.page_capacity));
                stats.record_access();
                tracing::trace!(pages = self.pages.len(), "chained overflow page");
            }
            current += 1;
            stats.record_access();
        }

        self.pages[current].push(key);
    }

    /// Walks the chain looking for `key`.
    pub fn search(&self, key: Key, stats: &mut AccessStats) -> bool {
        stats.record_access();

        for page in &self.pages {
            if page.contains(key) {
                return true;
            }
            stats.record_access();
        }

        stats.rollback_access();
        false
    }

    /// Frees every page in the chain, returning how many were freed.
    pub fn release(self, stats: &mut AccessStats) -> usize {
        let freed = self.pages.len();
        for _ in &self.pages {
            stats.record_access();
        }
        freed
    }

    /// Returns true if any page holds `key`. Charges no accesses.
    pub fn contains(&self, key: Key) -> bool {
        self.pages.iter().any(|page| page.contains(key))
    }

    /// Returns the pages from head to tail.
    #[inline]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Returns the number of pages, primary included.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns the number of overflow pages.
    #[inline]
    pub fn overflow_count(&self) -> usize {
        self.pages.len() - 1
    }

    /// Returns the capacity of each page.
    #[inline]
    pub fn page_capacity(&self) -> usize {
        self.page_capacity
    }

    /// Returns the total number of keys.
    pub fn len(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Returns true if the chain holds no keys.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Page::is_empty)
    }

    /// Iterates over every key, head page first.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.pages.iter().flat_map(|page| page.keys().iter().copied())
    }

    /// Returns the position of the first non-tail page that is not full.
    pub fn first_underfilled(&self) -> Option<usize> {
        let tail = self.pages.len() - 1;
        self.pages[..tail].iter().position(|page| !page.is_full())
    }
}
