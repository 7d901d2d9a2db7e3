//! wordtally - cumulative word frequencies for HTML-wrapped texts.
//!
//! The pipeline reads a document line by line, extracts the words
//! between its start and end markers, merges them into a persistent
//! [`store::WordStore`], and returns every recorded word ranked by
//! frequency.
//!
//! ```no_run
//! use wordtally::analysis::analyze_and_report;
//! use wordtally::extractor::Extractor;
//! use wordtally::report::render_listing;
//! use wordtally::store::SqliteStore;
//!
//! let lines = wordtally::source::open_file("raven.htm".as_ref())?;
//! let mut store = SqliteStore::new("word_occurrences.db");
//! let report = analyze_and_report(lines, &Extractor::default(), &mut store)?;
//! print!("{}", render_listing(&report));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod models;
pub mod report;
pub mod source;
pub mod store;

pub use analysis::analyze_and_report;
pub use error::{AnalysisError, SourceError, StoreError};
pub use models::{RankedReport, Token, WordCount};
