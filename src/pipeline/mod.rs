//! Interactive playback: consent, manifest listing, selection, playback.
//!
//! # Architecture
//!
//! ```text
//! stdin ──▶ Console ──▶ PlaybackController::step()
//!                              │
//!                              ├─ Consent   → Locale::is_affirmative
//!                              │                └─ Manifest::lines(total)
//!                              ├─ Browsing  → parse_selection(1..=total)
//!                              └─ Playing   → ArtifactNaming::artifact(i)
//!                                               └─ AudioDevice::play (blocking)
//!
//! SessionState { total_generated, state, plays, recoverable_errors }
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use article_narrator::audio::CpalAudioDevice;
//! use article_narrator::content::Paragraph;
//! use article_narrator::pipeline::{Locale, PlaybackController};
//! use article_narrator::tts::ArtifactNaming;
//!
//! let paragraphs = Paragraph::number(["First.", "Second."]);
//! let mut controller = PlaybackController::new(
//!     paragraphs,
//!     2,
//!     ArtifactNaming::default(),
//!     Arc::new(CpalAudioDevice::default()),
//! )
//! .with_locale(Locale::for_tag("en"));
//!
//! let stdin = std::io::stdin();
//! controller.run(stdin.lock(), std::io::stdout()).unwrap();
//! ```

pub mod controller;
pub mod locale;
pub mod manifest;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{parse_selection, BrowseError, Console, PlaybackController};
pub use locale::Locale;
pub use manifest::{DescriptionEntry, Manifest, ManifestError};
pub use state::{PlaybackState, SessionState};
