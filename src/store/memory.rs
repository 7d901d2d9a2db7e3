//! In-memory word store.

use super::{sorted_counts, validate_word, WordStore};
use crate::error::StoreError;
use crate::models::WordCount;
use std::collections::HashMap;

/// A [`WordStore`] that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    counts: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl WordStore for MemoryStore {
    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn increment_word(&mut self, word: &str) -> Result<(), StoreError> {
        validate_word(word)?;
        *self.counts.entry(word.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn frequency_of(&self, word: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.counts.get(word).copied())
    }

    fn list_sorted_by_frequency_desc(&self) -> Result<Vec<WordCount>, StoreError> {
        Ok(sorted_counts(&self.counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_increment() {
        let mut store = MemoryStore::new();
        store.increment_word("raven").unwrap();
        assert_eq!(store.frequency_of("raven").unwrap(), Some(1));

        store.increment_word("raven").unwrap();
        assert_eq!(store.frequency_of("raven").unwrap(), Some(2));
        assert_eq!(store.frequency_of("dove").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sorted_listing() {
        let mut store = MemoryStore::new();
        for word in ["fox", "dog", "the", "the", "the"] {
            store.increment_word(word).unwrap();
        }

        let list = store.list_sorted_by_frequency_desc().unwrap();
        assert_eq!(
            list,
            vec![
                WordCount::new("the", 3),
                WordCount::new("dog", 1),
                WordCount::new("fox", 1),
            ]
        );
    }

    #[test]
    fn test_rejects_invalid_word() {
        let mut store = MemoryStore::new();
        assert!(store.increment_word("").is_err());
        assert!(store.is_empty());
    }
}
