//! Remote document fetching.
//!
//! The document is downloaded into memory with reqwest and handed to the
//! extractor as a line source. Transport and status failures surface as
//! [`SourceError::Http`]; bodies over the size limit as
//! [`SourceError::TooLarge`].

use super::{from_reader, LineSource};
use crate::error::SourceError;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, info};

/// Largest body accepted by default (32 MiB).
pub const DEFAULT_MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

/// Upper bound on the buffer reserved from a Content-Length header.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Options for fetching a document.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// User-Agent header sent with the request.
    pub user_agent: String,
    /// Whether to show a download progress bar.
    pub show_progress: bool,
    /// Bodies larger than this are rejected.
    pub max_body_bytes: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            user_agent: concat!("wordtally/", env!("CARGO_PKG_VERSION")).to_string(),
            show_progress: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Fetch a document and expose its body as lines.
pub async fn fetch_url(url: &str, options: &FetchOptions) -> Result<LineSource, SourceError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SourceError::InvalidUrl {
            url: url.to_string(),
            reason: "URL must start with 'http://' or 'https://'".to_string(),
        });
    }

    info!("Fetching document: {}", url);

    let http_err = |source: reqwest::Error| SourceError::Http {
        url: url.to_string(),
        source,
    };
    let too_large = || SourceError::TooLarge {
        url: url.to_string(),
        limit: options.max_body_bytes,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .user_agent(options.user_agent.clone())
        .build()
        .map_err(http_err)?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(http_err)?;

    let total = response.content_length();
    debug!("Response status {}, length {:?}", response.status(), total);

    if total.is_some_and(|len| len > options.max_body_bytes) {
        return Err(too_large());
    }

    let progress_bar = if options.show_progress {
        let pb = match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("#>-"),
                );
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        Some(pb)
    } else {
        None
    };

    let mut body = Vec::with_capacity(total.map_or(0, |len| len.min(MAX_PREALLOCATION)) as usize);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(http_err)?;
        if (body.len() + chunk.len()) as u64 > options.max_body_bytes {
            if let Some(ref pb) = progress_bar {
                pb.abandon();
            }
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
        if let Some(ref pb) = progress_bar {
            pb.set_position(body.len() as u64);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    info!("Downloaded {} bytes from {}", body.len(), url);
    Ok(from_reader(Cursor::new(body)))
}
