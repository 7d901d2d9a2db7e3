//! Report generation.
//!
//! The numbered listing is the primary output and its format is fixed:
//! one `"<rank>. <word>: <frequency>"` line per entry. Markdown and JSON
//! renderings wrap the same ranked words with run metadata.

use crate::models::{RankedReport, Report, ReportMetadata};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Render a ranked report as a 1-indexed numbered listing.
pub fn render_listing(report: &RankedReport) -> String {
    let mut output = String::new();

    for (index, entry) in report.iter().enumerate() {
        output.push_str(&format!("{}. {}: {}\n", index + 1, entry.word, entry.frequency));
    }

    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Word Tally Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_words_section(&report.words));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Store:** `{}`\n", metadata.store));
    section.push_str(&format!(
        "- **Words Extracted This Run:** {}\n",
        metadata.tokens_extracted
    ));
    section.push_str(&format!(
        "- **Distinct Words (all runs):** {}\n",
        metadata.distinct_words
    ));
    section.push_str(&format!(
        "- **Total Occurrences (all runs):** {}\n",
        metadata.total_occurrences
    ));
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n\n",
        metadata.duration_seconds
    ));

    section
}

/// Generate the ranked words table.
fn generate_words_section(words: &RankedReport) -> String {
    let mut section = String::new();

    section.push_str("## Word Frequencies\n\n");

    if words.is_empty() {
        section.push_str("*No words recorded yet.*\n\n");
        return section;
    }

    section.push_str("| Rank | Word | Frequency |\n");
    section.push_str("|-----:|------|----------:|\n");
    for (index, entry) in words.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            index + 1,
            entry.word,
            entry.frequency
        ));
    }
    section.push('\n');

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by wordtally*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(())
}
