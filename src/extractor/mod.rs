//! Word extraction from markup-wrapped documents.
//!
//! The extractor walks a line source with a small state machine: lines
//! before the start marker are skipped, lines inside the region are
//! normalized and split into tokens, and the end marker stops reading.

use crate::error::{Result, SourceError};
use crate::models::Token;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

/// Default start marker: the title heading.
pub const DEFAULT_START_MARKER: &str = "<h1>";

/// Default end marker: the end-of-chapter comment.
pub const DEFAULT_END_MARKER: &str = "<!--end chapter-->";

lazy_static! {
    static ref MARKUP_TAG: Regex = Regex::new(r"<.*?>").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z ]").unwrap();
    static ref DEFAULT_START: Regex = Regex::new(DEFAULT_START_MARKER).unwrap();
    static ref DEFAULT_END: Regex = Regex::new(DEFAULT_END_MARKER).unwrap();
}

/// The two patterns bounding the scanned region.
///
/// A marker matches when its pattern occurs anywhere in the line.
#[derive(Debug, Clone)]
pub struct BoundaryMarkers {
    start: Regex,
    end: Regex,
}

impl BoundaryMarkers {
    /// Compiles a pair of marker patterns.
    pub fn new(start: &str, end: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            start: Regex::new(start)?,
            end: Regex::new(end)?,
        })
    }

    pub fn is_start(&self, line: &str) -> bool {
        self.start.is_match(line)
    }

    pub fn is_end(&self, line: &str) -> bool {
        self.end.is_match(line)
    }
}

impl Default for BoundaryMarkers {
    fn default() -> Self {
        Self {
            start: DEFAULT_START.clone(),
            end: DEFAULT_END.clone(),
        }
    }
}

/// Position of the scanner relative to the region of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for the start marker.
    Outside,
    /// Tokenizing lines.
    Inside,
    /// End marker seen; nothing more is read.
    Terminated,
}

/// Result of a full scan.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Tokens in document order, duplicates kept.
    pub tokens: Vec<Token>,
    /// State the scanner stopped in.
    pub state: ScanState,
    /// Lines pulled from the source, marker lines included.
    pub lines_read: usize,
}

/// Extracts word tokens from the bounded region of a document.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    markers: BoundaryMarkers,
}

impl Extractor {
    pub fn new(markers: BoundaryMarkers) -> Self {
        Self { markers }
    }

    /// Extracts the tokens of the bounded region.
    pub fn extract<I>(&self, lines: I) -> Result<Vec<Token>>
    where
        I: IntoIterator<Item = std::io::Result<String>>,
    {
        Ok(self.scan(lines)?.tokens)
    }

    /// Runs the boundary state machine over `lines`.
    ///
    /// Lines are pulled lazily; once the end marker is seen the source is
    /// not read any further. A read failure aborts the scan and discards
    /// the tokens collected so far.
    pub fn scan<I>(&self, lines: I) -> Result<Extraction>
    where
        I: IntoIterator<Item = std::io::Result<String>>,
    {
        let mut state = ScanState::Outside;
        let mut tokens = Vec::new();
        let mut lines_read = 0;

        for line in lines {
            lines_read += 1;
            let line = line.map_err(|source| SourceError::Read {
                line: lines_read,
                source,
            })?;

            match state {
                ScanState::Outside => {
                    if self.markers.is_start(&line) {
                        debug!("Start marker found at line {}", lines_read);
                        state = ScanState::Inside;
                    }
                }
                ScanState::Inside => {
                    if self.markers.is_end(&line) {
                        debug!("End marker found at line {}", lines_read);
                        state = ScanState::Terminated;
                        break;
                    }
                    tokens.extend(normalize_line(&line));
                }
                ScanState::Terminated => break,
            }
        }

        info!(
            "Extracted {} tokens from {} lines ({:?})",
            tokens.len(),
            lines_read,
            state
        );

        Ok(Extraction {
            tokens,
            state,
            lines_read,
        })
    }
}

/// Normalizes one line and splits it into tokens.
///
/// Markup tags are removed first, then everything that is not an ASCII
/// letter or a space. Empty candidates are dropped.
pub fn normalize_line(line: &str) -> Vec<Token> {
    let untagged = MARKUP_TAG.replace_all(line, "");
    let letters = NON_WORD.replace_all(&untagged, "");

    letters.split_whitespace().filter_map(Token::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use std::io::{Error, ErrorKind};

    fn ok_lines(lines: &[&str]) -> Vec<std::io::Result<String>> {
        lines.iter().map(|l| Ok(l.to_string())).collect()
    }

    fn words(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::as_str).collect()
    }

    #[test]
    fn test_boundary_detection() {
        let lines = ok_lines(&[
            "noise",
            "<h1>Title</h1>",
            "Hello world",
            "<!--end chapter-->",
            "ignored",
        ]);

        let tokens = Extractor::default().extract(lines).unwrap();
        assert_eq!(words(&tokens), vec!["Hello", "world"]);
    }

    #[test]
    fn test_normalization() {
        let tokens = normalize_line("Don't stop-now, 123!");
        assert_eq!(words(&tokens), vec!["Dont", "stopnow"]);
    }

    #[test]
    fn test_markup_is_stripped_before_filtering() {
        let tokens = normalize_line("<p class=\"poem\">Once upon a <i>midnight</i> dreary,</p>");
        assert_eq!(words(&tokens), vec!["Once", "upon", "a", "midnight", "dreary"]);
    }

    #[test]
    fn test_tabs_are_stripped_not_split() {
        let tokens = normalize_line("quoth\tthe  Raven");
        assert_eq!(words(&tokens), vec!["quoththe", "Raven"]);
    }

    #[test]
    fn test_empty_token_suppression() {
        assert!(normalize_line("123!!!").is_empty());
        assert!(normalize_line("   ").is_empty());
        assert!(normalize_line("<br/>").is_empty());
    }

    #[test]
    fn test_no_end_marker() {
        let lines = ok_lines(&["<h1>The Raven</h1>", "Once upon", "a midnight dreary"]);

        let extraction = Extractor::default().scan(lines).unwrap();
        assert_eq!(
            words(&extraction.tokens),
            vec!["Once", "upon", "a", "midnight", "dreary"]
        );
        assert_eq!(extraction.state, ScanState::Inside);
        assert_eq!(extraction.lines_read, 3);
    }

    #[test]
    fn test_no_start_marker_yields_nothing() {
        let lines = ok_lines(&["plain text", "<!--end chapter-->", "more text"]);

        let extraction = Extractor::default().scan(lines).unwrap();
        assert!(extraction.tokens.is_empty());
        assert_eq!(extraction.state, ScanState::Outside);
    }

    #[test]
    fn test_start_marker_inside_region_is_tokenized() {
        let lines = ok_lines(&["<h1>One</h1>", "<h1>Two</h1>", "<!--end chapter-->"]);

        let tokens = Extractor::default().extract(lines).unwrap();
        assert_eq!(words(&tokens), vec!["Two"]);
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let lines = ok_lines(&["<h1>x</h1>", "nevermore Nevermore nevermore"]);

        let tokens = Extractor::default().extract(lines).unwrap();
        assert_eq!(words(&tokens), vec!["nevermore", "Nevermore", "nevermore"]);
    }

    #[test]
    fn test_source_not_read_after_end_marker() {
        let lines = vec![
            Ok("<h1>x</h1>".to_string()),
            Ok("word".to_string()),
            Ok("<!--end chapter-->".to_string()),
            Err(Error::new(ErrorKind::Other, "should never be reached")),
        ];

        let extraction = Extractor::default().scan(lines).unwrap();
        assert_eq!(words(&extraction.tokens), vec!["word"]);
        assert_eq!(extraction.state, ScanState::Terminated);
        assert_eq!(extraction.lines_read, 3);
    }

    #[test]
    fn test_propagated_failure() {
        let lines = vec![
            Ok("<h1>x</h1>".to_string()),
            Ok("some words".to_string()),
            Err(Error::new(ErrorKind::ConnectionReset, "connection reset")),
            Ok("more".to_string()),
        ];

        let result = Extractor::default().extract(lines);
        match result {
            Err(AnalysisError::SourceRead(SourceError::Read { line, .. })) => assert_eq!(line, 3),
            other => panic!("expected SourceRead, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_markers() {
        let markers = BoundaryMarkers::new(r"^\*\*\* START", r"^\*\*\* END").unwrap();
        let lines = ok_lines(&["header", "*** START OF TEXT", "alpha beta", "*** END", "gamma"]);

        let tokens = Extractor::new(markers).extract(lines).unwrap();
        assert_eq!(words(&tokens), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_invalid_marker_pattern() {
        assert!(BoundaryMarkers::new("(unclosed", DEFAULT_END_MARKER).is_err());
    }

    #[test]
    fn test_fixture_document() {
        let text = include_str!("../../fixtures/raven_excerpt.htm");
        let lines = text.lines().map(|l| Ok(l.to_string()));

        let tokens = Extractor::default().extract(lines).unwrap();
        let words = words(&tokens);

        assert_eq!(&words[..5], &["by", "Edgar", "Allan", "Poe", "Once"]);
        assert_eq!(words.last(), Some(&"ldquoNevermorerdquo"));
        assert!(words.contains(&"loremdash"));
        assert!(!words.contains(&"Gutenberg"));
        assert!(!words.contains(&"Title"));
    }
}
