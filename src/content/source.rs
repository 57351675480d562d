//! Core `ContentSource` trait and its HTTP and file implementations.
//!
//! A content source turns a location into ordered text blocks.  Any failure
//! here is fatal to the run: there is nothing to narrate without content.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SourceConfig;
use crate::content::extract::{extract_paragraphs, split_plain_text};
use crate::content::paragraph::Paragraph;

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// Errors that abort the run before any audio is produced.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport or connection error.
    #[error("download failed: {0}")]
    Request(String),

    /// The download did not complete within the configured timeout.
    #[error("download timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// A local source file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document contained no usable text.
    #[error("the document does not contain valid text to process")]
    NoContent,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ContentSource trait
// ---------------------------------------------------------------------------

/// Async trait for anything that can produce the ordered text blocks of a
/// document.
///
/// Implementations return blocks in document order; trimming and blank
/// filtering are repeated by [`fetch_paragraphs`], so implementations need
/// not be strict about it.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError>;
}

/// Fetch `url` and number its blocks.
///
/// # Errors
///
/// Propagates the source's [`FetchError`]; returns [`FetchError::NoContent`]
/// when the document is empty or entirely blank.
pub async fn fetch_paragraphs(
    source: &dyn ContentSource,
    url: &str,
) -> Result<Vec<Paragraph>, FetchError> {
    let blocks = source.fetch(url).await?;
    let paragraphs = Paragraph::number(blocks);
    if paragraphs.is_empty() {
        return Err(FetchError::NoContent);
    }
    log::info!("content: {} paragraphs from {url}", paragraphs.len());
    Ok(paragraphs)
}

/// Pick the source implementation for the configured location: HTTP(S) URLs
/// are downloaded, anything else is read as a local text file.
pub fn source_for(config: &SourceConfig) -> Box<dyn ContentSource> {
    if is_web_url(&config.url) {
        Box::new(HttpContentSource::from_config(config))
    } else {
        Box::new(TextFileSource)
    }
}

fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ---------------------------------------------------------------------------
// HttpContentSource
// ---------------------------------------------------------------------------

/// Downloads a web page and extracts its paragraphs.
pub struct HttpContentSource {
    client: reqwest::Client,
}

impl HttpContentSource {
    /// Build a source from config.  The client carries the configured
    /// timeout and user agent; a default client is the fallback if the
    /// builder fails.
    pub fn from_config(config: &SourceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError> {
        log::debug!("content: GET {url}");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let is_plain_text = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/plain"));

        let body = response.text().await?;

        Ok(if is_plain_text {
            split_plain_text(&body)
        } else {
            extract_paragraphs(&body)
        })
    }
}

// ---------------------------------------------------------------------------
// TextFileSource
// ---------------------------------------------------------------------------

/// Reads a local UTF-8 text file; every non-blank line is one block.
///
/// A `file://` prefix on the location is accepted and stripped.
pub struct TextFileSource;

#[async_trait]
impl ContentSource for TextFileSource {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io { path, source })?;
        Ok(split_plain_text(&text))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
