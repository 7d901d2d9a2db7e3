//! wordtally - cumulative word frequencies for HTML-wrapped texts
//!
//! A CLI that fetches a document, counts the words in its marked region,
//! merges them into a persistent tally, and prints the ranked result.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (arguments, config, document source, word store, output)

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use wordtally::analysis::{self, words_seen_in_run};
use wordtally::cli::{Args, OutputFormat};
use wordtally::config::{Config, CONFIG_FILE_NAME};
use wordtally::extractor::Extractor;
use wordtally::models::{Report, ReportMetadata};
use wordtally::report;
use wordtally::source::{self, LineSource};
use wordtally::store::{SqliteStore, WordStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("wordtally v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Analysis failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .wordtally.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the document URL, markers, and store location.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Run one analysis and emit the report.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let extractor = Extractor::new(config.boundary_markers()?);

    // Open the store before downloading so a broken store fails fast.
    let store = if args.dry_run {
        None
    } else {
        Some(open_store(&config)?)
    };

    let (origin, lines) = open_source(&args, &config).await?;

    let Some(mut store) = store else {
        return handle_dry_run(&origin, lines, &extractor);
    };

    let outcome = analysis::analyze(lines, &extractor, &mut store)?;
    let updated = words_seen_in_run(&outcome.report, &outcome.tokens).len();

    let shown = match config.report.limit {
        Some(limit) => outcome.report.top(limit),
        None => outcome.report.clone(),
    };

    let tally = Report {
        metadata: ReportMetadata {
            source: origin,
            analysis_date: Utc::now(),
            tokens_extracted: outcome.tokens.len(),
            distinct_words: outcome.report.len(),
            total_occurrences: outcome.report.total_occurrences(),
            store: store.path().display().to_string(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        words: shown,
    };

    let output = match config.general.format {
        OutputFormat::Text => report::render_listing(&tally.words),
        OutputFormat::Markdown => report::generate_markdown_report(&tally),
        OutputFormat::Json => report::generate_json_report(&tally)?,
    };

    match args.output {
        Some(ref path) => {
            report::write_report(&output, path)?;
            status(&args, &format!("✅ Report saved to: {}", path.display()));
        }
        None => print!("{}", output),
    }

    status(
        &args,
        &format!(
            "📊 {} words this run ({} distinct updated), {} distinct words in {} ({:.1}s)",
            tally.metadata.tokens_extracted,
            updated,
            tally.metadata.distinct_words,
            tally.metadata.store,
            tally.metadata.duration_seconds
        ),
    );

    Ok(())
}

/// Open the word store and make sure its table exists.
fn open_store(config: &Config) -> Result<SqliteStore> {
    let mut store = SqliteStore::new(&config.store.path);
    store
        .ensure_schema()
        .with_context(|| format!("Failed to open word store {}", config.store.path.display()))?;
    Ok(store)
}

/// Open the configured line source. `--file` wins over the URL.
async fn open_source(args: &Args, config: &Config) -> Result<(String, LineSource)> {
    if let Some(ref path) = args.file {
        let lines = source::open_file(path)?;
        return Ok((path.display().to_string(), lines));
    }

    let url = config.source.url.clone();
    status(args, &format!("📥 Fetching document: {}", url));

    let lines = source::fetch_url(&url, &config.fetch_options(!args.quiet)).await?;
    Ok((url, lines))
}

/// Handle --dry-run: extract, print counts, leave the store alone.
fn handle_dry_run(origin: &str, lines: LineSource, extractor: &Extractor) -> Result<()> {
    let extraction = extractor.scan(lines)?;

    let distinct: std::collections::HashSet<&str> =
        extraction.tokens.iter().map(|t| t.as_str()).collect();

    println!("🔍 Dry run: {}", origin);
    println!("   Lines read: {}", extraction.lines_read);
    println!("   Scanner stopped: {:?}", extraction.state);
    println!("   Words extracted: {}", extraction.tokens.len());
    println!("   Distinct words: {}", distinct.len());
    println!("\n✅ Dry run complete. The word store was not modified.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Print a status line to stderr unless quiet.
fn status(args: &Args, message: &str) {
    if !args.quiet {
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_broken_store_fails_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = blocker.join("words.db");

        // Nothing listens on the discard port; reaching the fetch would
        // fail with a connection error instead.
        let args = Args::parse_from([
            "wordtally",
            "--quiet",
            "--url",
            "http://127.0.0.1:9/raven.htm",
            "--store",
            store.to_str().unwrap(),
        ]);

        let err = tokio_test::block_on(run(args)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open word store"));
    }

    #[test]
    fn test_dry_run_leaves_store_alone() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("raven.htm");
        std::fs::write(&doc, include_str!("../fixtures/raven_excerpt.htm")).unwrap();
        let store = dir.path().join("words.db");

        let args = Args::parse_from([
            "wordtally",
            "--quiet",
            "--dry-run",
            "--file",
            doc.to_str().unwrap(),
            "--store",
            store.to_str().unwrap(),
        ]);

        tokio_test::block_on(run(args)).unwrap();
        assert!(!store.exists());
    }
}
