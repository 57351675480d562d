//! Core `SpeechSynthesizer` trait and the Google Translate implementation.
//!
//! [`GoogleTranslateTts`] calls the public `translate_tts` endpoint, the same
//! one used by the Google Translate "listen" button.  Each request carries at
//! most [`TtsConfig::max_chunk_chars`] characters, so long paragraphs are
//! split with [`split_for_speech`] and the returned MP3 fragments are
//! concatenated in order (MP3 frames are self-delimiting, so the result is a
//! playable file).

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TtsConfig;
use crate::tts::chunk::split_for_speech;

// ---------------------------------------------------------------------------
// SynthError
// ---------------------------------------------------------------------------

/// Errors that can occur while synthesizing one paragraph.
#[derive(Debug, Clone, Error)]
pub enum SynthError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speech request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("speech endpoint returned HTTP {0}")]
    Status(u16),

    /// There was no text to speak.
    #[error("nothing to synthesize")]
    EmptyText,

    /// The endpoint returned no audio bytes.
    #[error("speech endpoint returned no audio")]
    EmptyAudio,
}

impl From<reqwest::Error> for SynthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SynthError::Timeout
        } else {
            SynthError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech backends.
///
/// Implementors must be `Send + Sync` so they can be held behind an
/// `Arc<dyn SpeechSynthesizer>`.
///
/// # Arguments
/// * `text`     – Paragraph text to speak.
/// * `language` – Language tag passed through to the backend (`"en"`, `"es"`).
///
/// Returns the encoded audio bytes (MP3 for [`GoogleTranslateTts`]).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthError>;
}

// ---------------------------------------------------------------------------
// GoogleTranslateTts
// ---------------------------------------------------------------------------

/// Speech synthesis through Google Translate's `translate_tts` endpoint.
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    config: TtsConfig,
}

impl GoogleTranslateTts {
    /// Build a synthesizer from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`; a default client is the fallback if the builder
    /// fails.
    pub fn from_config(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/translate_tts", self.config.base_url.trim_end_matches('/'))
    }

    fn speed(&self) -> &'static str {
        if self.config.slow {
            "0.3"
        } else {
            "1"
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthError> {
        let chunks = split_for_speech(text, self.config.max_chunk_chars);
        if chunks.is_empty() {
            return Err(SynthError::EmptyText);
        }

        let url = self.endpoint();
        let total = chunks.len().to_string();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();

            let response = self
                .client
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("q", chunk.as_str()),
                    ("tl", language),
                    ("client", "tw-ob"),
                    ("ttsspeed", self.speed()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .header(reqwest::header::REFERER, "https://translate.google.com/")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SynthError::Status(status.as_u16()));
            }

            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Err(SynthError::EmptyAudio);
            }
            audio.extend_from_slice(&bytes);
        }

        log::debug!(
            "tts: {} bytes for {} chunk(s), lang={language}",
            audio.len(),
            chunks.len()
        );
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns fixed bytes without touching the network and
/// counts how often it was called.
///
/// Texts listed with [`MockSynthesizer::failing_on`] fail with
/// [`SynthError::Status`]`(500)`.
#[cfg(test)]
pub struct MockSynthesizer {
    audio: Vec<u8>,
    failing: Vec<String>,
    calls: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl MockSynthesizer {
    /// Create a mock that always returns `audio`.
    pub fn ok(audio: &[u8]) -> Self {
        Self {
            audio: audio.to_vec(),
            failing: Vec::new(),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Make synthesis of `text` fail.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.push(text.to_string());
        self
    }

    /// `(text, language)` pairs received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), language.to_string()));
        if self.failing.iter().any(|t| t == text) {
            return Err(SynthError::Status(500));
        }
        Ok(self.audio.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
