//! SQLite-backed word store.
//!
//! Counts live in a single `word` table keyed by the word text. Every
//! increment is one autocommitted upsert, so a failure part-way through a
//! run keeps the increments that came before it.

use super::{validate_word, WordStore};
use crate::error::StoreError;
use crate::models::WordCount;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CREATE_WORD_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS word (
        word_text TEXT PRIMARY KEY,
        frequency INTEGER NOT NULL
    )
"#;

const INCREMENT_WORD: &str = r#"
    INSERT INTO word (word_text, frequency)
    VALUES (?1, 1)
    ON CONFLICT(word_text) DO UPDATE SET frequency = frequency + 1
"#;

const SELECT_FREQUENCY: &str = "SELECT frequency FROM word WHERE word_text = ?1";

const SELECT_RANKED: &str = r#"
    SELECT word_text, frequency
    FROM word
    ORDER BY frequency DESC, word_text ASC
"#;

/// A durable [`WordStore`] kept in an SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteStore {
    /// Creates a store for the database at `path`. Nothing is opened
    /// until [`WordStore::ensure_schema`] runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::NotInitialized)
    }

    fn open(&self) -> Result<Connection, StoreError> {
        let parent = parent_dir(&self.path);
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;

        debug!("Opening word store {}", self.path.display());
        Ok(Connection::open(&self.path)?)
    }
}

impl WordStore for SqliteStore {
    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        if self.conn.is_none() {
            self.conn = Some(self.open()?);
        }

        let conn = self.connection()?;
        conn.execute_batch(CREATE_WORD_TABLE)?;

        let words: i64 = conn.query_row("SELECT COUNT(*) FROM word", [], |row| row.get(0))?;
        info!(
            "Word store ready at {} ({} words)",
            self.path.display(),
            words
        );
        Ok(())
    }

    fn increment_word(&mut self, word: &str) -> Result<(), StoreError> {
        validate_word(word)?;
        self.connection()?.execute(INCREMENT_WORD, params![word])?;
        Ok(())
    }

    fn frequency_of(&self, word: &str) -> Result<Option<u64>, StoreError> {
        let frequency: Option<i64> = self
            .connection()?
            .query_row(SELECT_FREQUENCY, params![word], |row| row.get(0))
            .optional()?;

        frequency.map(to_frequency).transpose()
    }

    fn list_sorted_by_frequency_desc(&self) -> Result<Vec<WordCount>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(SELECT_RANKED)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut list = Vec::new();
        for row in rows {
            let (word, frequency) = row?;
            list.push(WordCount::new(word, to_frequency(frequency)?));
        }
        Ok(list)
    }
}

fn to_frequency(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value)
        .map_err(|_| StoreError::Backend(format!("negative frequency {} in word table", value)))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_increment_before_schema_fails() {
        let dir = tempdir().unwrap();
        let mut store = SqliteStore::new(dir.path().join("words.db"));

        assert!(matches!(
            store.increment_word("raven"),
            Err(StoreError::NotInitialized)
        ));
        assert!(matches!(
            store.list_sorted_by_frequency_desc(),
            Err(StoreError::NotInitialized)
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("words.db");
        let mut store = SqliteStore::new(&path);

        store.ensure_schema().unwrap();
        store.increment_word("raven").unwrap();
        store.ensure_schema().unwrap();

        assert!(path.exists());
        assert_eq!(store.frequency_of("raven").unwrap(), Some(1));
    }

    #[test]
    fn test_counts_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        {
            let mut store = SqliteStore::new(&path);
            store.ensure_schema().unwrap();
            for word in ["the", "fox", "the"] {
                store.increment_word(word).unwrap();
            }
        }

        let mut reopened = SqliteStore::new(&path);
        reopened.ensure_schema().unwrap();
        assert_eq!(reopened.frequency_of("the").unwrap(), Some(2));
        assert_eq!(reopened.frequency_of("fox").unwrap(), Some(1));
        assert_eq!(reopened.frequency_of("raven").unwrap(), None);

        reopened.increment_word("the").unwrap();
        assert_eq!(
            reopened.list_sorted_by_frequency_desc().unwrap(),
            vec![WordCount::new("the", 3), WordCount::new("fox", 1)]
        );
    }

    #[test]
    fn test_reopening_never_recounts_increments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        {
            let mut store = SqliteStore::new(&path);
            store.ensure_schema().unwrap();
            store.increment_word("raven").unwrap();
        }

        // Repeated initialization without further increments must not
        // change any count.
        for _ in 0..3 {
            let mut store = SqliteStore::new(&path);
            store.ensure_schema().unwrap();
            assert_eq!(store.frequency_of("raven").unwrap(), Some(1));
        }
    }

    #[test]
    fn test_ties_listed_by_byte_order() {
        let dir = tempdir().unwrap();
        let mut store = SqliteStore::new(dir.path().join("words.db"));
        store.ensure_schema().unwrap();

        for word in ["the", "The", "apple", "the", "The"] {
            store.increment_word(word).unwrap();
        }

        assert_eq!(
            store.list_sorted_by_frequency_desc().unwrap(),
            vec![
                WordCount::new("The", 2),
                WordCount::new("the", 2),
                WordCount::new("apple", 1),
            ]
        );
    }

    #[test]
    fn test_existing_table_is_reused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE word (word_text TEXT PRIMARY KEY, frequency INTEGER NOT NULL);
                 INSERT INTO word VALUES ('nevermore', 4);",
            )
            .unwrap();
        }

        let mut store = SqliteStore::new(&path);
        store.ensure_schema().unwrap();
        store.increment_word("nevermore").unwrap();
        assert_eq!(store.frequency_of("nevermore").unwrap(), Some(5));
    }

    #[test]
    fn test_not_a_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");
        fs::write(&path, "this is not a database file\n".repeat(200)).unwrap();

        let mut store = SqliteStore::new(&path);
        assert!(matches!(
            store.ensure_schema(),
            Err(StoreError::Database(_))
        ));
    }

    #[test]
    fn test_empty_word_rejected() {
        let dir = tempdir().unwrap();
        let mut store = SqliteStore::new(dir.path().join("words.db"));
        store.ensure_schema().unwrap();

        assert!(matches!(
            store.increment_word(""),
            Err(StoreError::InvalidWord(_))
        ));
        assert!(store.list_sorted_by_frequency_desc().unwrap().is_empty());
    }
}
