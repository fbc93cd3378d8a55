//! Weighted pool: word -> replication count

use std::collections::BTreeMap;

/// Multiset over vocabulary words. Sampling probability of a word is its
/// count divided by `total()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightedPool {
    counts: BTreeMap<String, usize>,
}

impl WeightedPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `copies` of `word`. A word native to both directions accumulates both counts.
    pub fn add(&mut self, word: &str, copies: usize) {
        let count = self.counts.entry(word.to_string()).or_insert(0);
        *count = count.saturating_add(copies);
    }

    pub fn count(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Size of the flattened multiset, saturating at `usize::MAX`.
    pub fn total(&self) -> usize {
        self.counts.values().fold(0, |total, &count| total.saturating_add(count))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Distinct words, including soft-pruned ones with a zero count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(word, &count)| (word.as_str(), count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate() {
        let mut pool = WeightedPool::new();
        pool.add("Taxi", 10);
        pool.add("Taxi", 3);
        pool.add("개", 0);

        assert_eq!(pool.count("Taxi"), 13);
        assert_eq!(pool.count("개"), 0);
        assert_eq!(pool.count("missing"), 0);
        assert_eq!(pool.total(), 13);
        assert_eq!(pool.len(), 2);
        assert!(!pool.is_empty());
    }

    #[test]
    fn huge_counts_saturate() {
        let mut pool = WeightedPool::new();
        pool.add("Hund", usize::MAX);
        pool.add("Hund", 1);
        pool.add("Katze", 5);
        assert_eq!(pool.count("Hund"), usize::MAX);
        assert_eq!(pool.total(), usize::MAX);
    }

    #[test]
    fn zero_counts_leave_pool_empty() {
        let mut pool = WeightedPool::new();
        pool.add("개", 0);
        assert!(pool.is_empty());
    }
}
