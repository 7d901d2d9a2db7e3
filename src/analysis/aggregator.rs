//! Word-count aggregation.
//!
//! This module merges extracted tokens into a [`WordStore`] and reads the
//! cumulative counts back as a ranked report.

use crate::error::{Result, StoreError};
use crate::models::{RankedReport, Token, WordCount};
use crate::store::WordStore;
use std::collections::HashSet;
use tracing::{debug, info};

/// Statistics from one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Increments applied (one per token).
    pub increments: usize,
    /// Distinct words among the merged tokens.
    pub distinct_in_run: usize,
}

/// Merge tokens into the store, one increment per occurrence, in order.
///
/// Stops at the first failure. Increments applied before it stay applied.
pub fn merge_tokens<S>(tokens: &[Token], store: &mut S) -> std::result::Result<MergeStats, StoreError>
where
    S: WordStore + ?Sized,
{
    let mut distinct = HashSet::new();

    for (applied, token) in tokens.iter().enumerate() {
        store.increment_word(token.as_str()).map_err(|e| {
            debug!("Merge stopped after {} of {} increments", applied, tokens.len());
            e
        })?;
        distinct.insert(token.as_str());
    }

    let stats = MergeStats {
        increments: tokens.len(),
        distinct_in_run: distinct.len(),
    };
    info!(
        "Merged {} tokens ({} distinct) into word store",
        stats.increments, stats.distinct_in_run
    );
    Ok(stats)
}

/// Put store counts into report order: frequency descending, word ascending.
pub fn rank_word_counts(counts: Vec<WordCount>) -> RankedReport {
    RankedReport::from_counts(counts)
}

/// Read the whole store as a ranked report.
pub fn read_report<S>(store: &S) -> Result<RankedReport>
where
    S: WordStore + ?Sized,
{
    let counts = store.list_sorted_by_frequency_desc()?;
    Ok(rank_word_counts(counts))
}

/// Merge `tokens` into `store`, then return the cumulative ranked report.
pub fn aggregate<S>(tokens: &[Token], store: &mut S) -> Result<RankedReport>
where
    S: WordStore + ?Sized,
{
    merge_tokens(tokens, store)?;
    read_report(store)
}

/// Words whose cumulative count changed in this run, in report order.
pub fn words_seen_in_run<'a>(report: &'a RankedReport, tokens: &[Token]) -> Vec<&'a WordCount> {
    let seen: HashSet<&str> = tokens.iter().map(Token::as_str).collect();
    report
        .iter()
        .filter(|entry| seen.contains(entry.word.as_str()))
        .collect()
}
