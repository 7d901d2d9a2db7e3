//! Data models for the word tally.
//!
//! This module contains the core data structures used throughout
//! the application for representing tokens, counts, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A normalized word: non-empty, ASCII letters only, case preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Creates a token, or `None` if `word` is empty or has a non-letter.
    pub fn new(word: &str) -> Option<Self> {
        if !word.is_empty() && word.bytes().all(|b| b.is_ascii_alphabetic()) {
            Some(Self(word.to_string()))
        } else {
            None
        }
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Token {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Token::new(&value).ok_or_else(|| format!("not a valid token: {:?}", value))
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

/// Cumulative count of one word in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    /// The word text.
    pub word: String,
    /// Number of occurrences recorded across all runs.
    pub frequency: u64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }

    /// Report ordering: frequency descending, then word ascending.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| self.word.cmp(&other.word))
    }
}

/// Words ordered by descending frequency, ties broken alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedReport {
    entries: Vec<WordCount>,
}

impl RankedReport {
    /// Builds a report, putting `entries` into rank order.
    pub fn from_counts(mut entries: Vec<WordCount>) -> Self {
        entries.sort_by(WordCount::rank_cmp);
        Self { entries }
    }

    pub fn entries(&self) -> &[WordCount] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordCount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first `n` entries as a new report.
    pub fn top(&self, n: usize) -> Self {
        Self {
            entries: self.entries.iter().take(n).cloned().collect(),
        }
    }

    /// Sum of all frequencies.
    pub fn total_occurrences(&self) -> u64 {
        self.entries.iter().map(|e| e.frequency).sum()
    }

    /// Looks up the frequency of `word`.
    pub fn frequency_of(&self, word: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.word == word)
            .map(|e| e.frequency)
    }
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// URL or path of the analyzed document.
    pub source: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Tokens extracted and merged in this run.
    pub tokens_extracted: usize,
    /// Distinct words in the store after the merge.
    pub distinct_words: usize,
    /// Total occurrences in the store after the merge.
    pub total_occurrences: u64,
    /// Location of the word store.
    pub store: String,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete tally report handed to the display layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub words: RankedReport,
}
