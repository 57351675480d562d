//! Speech synthesis and the on-disk artifact cache.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      SynthesisCache                       │
//! │                                                           │
//! │   ┌────────────────┐        ┌──────────────────────────┐  │
//! │   │ ArtifactNaming │        │ SpeechSynthesizer (trait)│  │
//! │   │ - path_for(i)  │        │  └─ GoogleTranslateTts   │  │
//! │   │ - artifact(i)  │        │       └─ split_for_speech│  │
//! │   └───────┬────────┘        └────────────┬─────────────┘  │
//! │           │   exists? skip               │ missing? bytes │
//! │           └──────────────┬───────────────┘                │
//! │                          ▼                                │
//! │                 paragraph_<i>.mp3                         │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use article_narrator::config::AppConfig;
//! use article_narrator::content::Paragraph;
//! use article_narrator::tts::{ArtifactNaming, GoogleTranslateTts, SynthesisCache};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let cache = SynthesisCache::new(
//!         ArtifactNaming::from_config(&config.cache),
//!         Arc::new(GoogleTranslateTts::from_config(&config.tts)),
//!     );
//!
//!     let paragraphs = Paragraph::number(["Hello.", "World."]);
//!     let total = cache
//!         .ensure_artifacts(&paragraphs, &config.language, |index, path, outcome| {
//!             println!("paragraph {index}: {outcome:?} at {}", path.display());
//!         })
//!         .await;
//!     println!("{total} artifacts ready");
//! }
//! ```

pub mod cache;
pub mod chunk;
pub mod synthesizer;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use cache::{ArtifactNaming, AudioArtifact, CacheError, CacheOutcome, SynthesisCache};
pub use chunk::split_for_speech;
pub use synthesizer::{GoogleTranslateTts, SpeechSynthesizer, SynthError};

// test-only re-export so other modules' tests can build a cache without
// network access.
#[cfg(test)]
pub use synthesizer::MockSynthesizer;
