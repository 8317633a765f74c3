//! Frequency counting with first-seen tie breaking.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts observations while remembering the order keys were first seen.
///
/// Ranking is by count, ties resolved in favour of the key seen first, so
/// results are deterministic for a given input order.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    entries: Vec<(K, usize)>,
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Record one observation of `key`.
    pub fn add(&mut self, key: K) {
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys ordered by descending count.
    pub fn ranked(&self) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The most frequent key.
    pub fn most_common(&self) -> Option<K> {
        self.nth_most_common(0)
    }

    /// The key ranked `n` (0-based) by frequency.
    pub fn nth_most_common(&self, n: usize) -> Option<K> {
        self.ranked().into_iter().nth(n).map(|(key, _)| key)
    }
}

impl<K: Eq + Hash + Clone> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.add(key);
        }
        table
    }
}
