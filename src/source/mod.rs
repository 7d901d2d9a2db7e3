//! Line sources for the extractor.
//!
//! A line source is any iterator of `io::Result<String>`. This module
//! builds them from local files, readers, and remote documents.

mod fetch;

pub use fetch::{fetch_url, FetchOptions};

use crate::error::SourceError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// A lazily read sequence of document lines.
pub type LineSource = Box<dyn Iterator<Item = std::io::Result<String>> + Send>;

/// Wraps any buffered reader as a line source.
pub fn from_reader<R>(reader: R) -> LineSource
where
    R: BufRead + Send + 'static,
{
    Box::new(reader.lines())
}

/// Opens a local document.
pub fn open_file(path: &Path) -> Result<LineSource, SourceError> {
    info!("Reading document from file: {}", path.display());

    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(from_reader(BufReader::new(file)))
}
