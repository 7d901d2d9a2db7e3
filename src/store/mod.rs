//! Persistent word-count stores.
//!
//! The pipeline only talks to the [`WordStore`] trait. Concrete stores
//! are constructed by the caller with whatever location they need.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::models::WordCount;

/// A durable word → count mapping.
pub trait WordStore {
    /// Prepares the backing storage. Safe to call more than once.
    fn ensure_schema(&mut self) -> Result<(), StoreError>;

    /// Records one occurrence of `word`, inserting it with frequency 1 if absent.
    fn increment_word(&mut self, word: &str) -> Result<(), StoreError>;

    /// Current frequency of `word`, if it has ever been recorded.
    fn frequency_of(&self, word: &str) -> Result<Option<u64>, StoreError>;

    /// All words, frequency descending, ties by word ascending.
    fn list_sorted_by_frequency_desc(&self) -> Result<Vec<WordCount>, StoreError>;
}

/// Rejects keys that cannot be stored.
pub(crate) fn validate_word(word: &str) -> Result<(), StoreError> {
    if word.is_empty() {
        return Err(StoreError::InvalidWord(word.to_string()));
    }
    Ok(())
}

/// Sorts `(word, frequency)` pairs into report order.
pub(crate) fn sorted_counts<'a, I>(counts: I) -> Vec<WordCount>
where
    I: IntoIterator<Item = (&'a String, &'a u64)>,
{
    let mut list: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, frequency)| WordCount::new(word.clone(), *frequency))
        .collect();
    list.sort_by(WordCount::rank_cmp);
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_word() {
        assert!(validate_word("raven").is_ok());
        assert!(matches!(validate_word(""), Err(StoreError::InvalidWord(_))));
    }
}
