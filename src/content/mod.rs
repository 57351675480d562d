//! Content module: where the narrated text comes from.
//!
//! This module provides:
//! * [`Paragraph`]: one numbered, non-blank block of the document.
//! * [`ContentSource`]: async trait implemented by every document source.
//! * [`HttpContentSource`]: downloads a web page and keeps its `<p>` text.
//! * [`TextFileSource`]: reads a local text file line by line.
//! * [`fetch_paragraphs`]: fetch + number, failing on empty documents.
//! * [`FetchError`]: the only fatal error of the pipeline.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use article_narrator::config::AppConfig;
//! use article_narrator::content::{fetch_paragraphs, source_for};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let source = source_for(&config.source);
//!     let paragraphs = fetch_paragraphs(source.as_ref(), &config.source.url)
//!         .await
//!         .unwrap();
//!     for p in &paragraphs {
//!         println!("{}. {}", p.index, p.text);
//!     }
//! }
//! ```

pub mod extract;
pub mod paragraph;
pub mod source;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use extract::{decode_entities, extract_paragraphs, split_plain_text};
pub use paragraph::Paragraph;
pub use source::{
    fetch_paragraphs, source_for, ContentSource, FetchError, HttpContentSource, TextFileSource,
};
