//! Analysis pipeline.
//!
//! Composes the extractor and the aggregator into the single entry point
//! used by the presentation layer.

pub mod aggregator;

pub use aggregator::*;

use crate::error::Result;
use crate::extractor::Extractor;
use crate::models::{RankedReport, Token};
use crate::store::WordStore;
use tracing::warn;

/// Outcome of one full run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Tokens extracted from the document in this run.
    pub tokens: Vec<Token>,
    /// Cumulative ranked counts after the merge.
    pub report: RankedReport,
}

/// Extract tokens from `lines`, merge them into `store`, and return the
/// cumulative ranked report.
pub fn analyze_and_report<I, S>(lines: I, extractor: &Extractor, store: &mut S) -> Result<RankedReport>
where
    I: IntoIterator<Item = std::io::Result<String>>,
    S: WordStore + ?Sized,
{
    Ok(analyze(lines, extractor, store)?.report)
}

/// Like [`analyze_and_report`], but also returns this run's tokens.
pub fn analyze<I, S>(lines: I, extractor: &Extractor, store: &mut S) -> Result<AnalysisOutcome>
where
    I: IntoIterator<Item = std::io::Result<String>>,
    S: WordStore + ?Sized,
{
    store.ensure_schema()?;

    let extraction = extractor.scan(lines)?;
    if extraction.lines_read > 0 && extraction.tokens.is_empty() {
        warn!(
            "No words extracted from {} lines (scanner stopped {:?})",
            extraction.lines_read, extraction.state
        );
    }

    let report = aggregate(&extraction.tokens, store)?;

    Ok(AnalysisOutcome {
        tokens: extraction.tokens,
        report,
    })
}
