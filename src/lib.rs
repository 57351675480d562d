//! Article Narrator: turn a web article into per-paragraph speech files and
//! browse them from the terminal.
//!
//! ```text
//! content ──▶ tts (SynthesisCache) ──▶ pipeline (PlaybackController) ──▶ audio
//!   fetch        paragraph_<i>.mp3        consent / select / play          cpal
//! ```
//!
//! [`config`] holds the TOML settings shared by every stage.

pub mod audio;
pub mod config;
pub mod content;
pub mod pipeline;
pub mod tts;
