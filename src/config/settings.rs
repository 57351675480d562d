//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Every section is
//! `#[serde(default)]`, so a hand-edited file only needs the keys it changes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SourceConfig
// ---------------------------------------------------------------------------

/// Where the article comes from and how it is downloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Article URL.  A value without an `http://` / `https://` scheme is
    /// treated as a local text file path.
    pub url: String,
    /// Maximum seconds to wait for the download.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with the download request.
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "https://www.dailymail.co.uk/sciencetech/article-14680515/Sacred-pyramid-built-forgotten-civilization-Amazon-rainforest-worlds-tallest-ancient-structure.html".into(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) article-narrator/0.1".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the speech-synthesis backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Base URL of the Google Translate host serving `/translate_tts`.
    pub base_url: String,
    /// Request the slower speaking rate.
    pub slow: bool,
    /// Longest text accepted by a single synthesis request, in characters.
    pub max_chunk_chars: usize,
    /// Maximum seconds to wait for one synthesis request.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".into(),
            slow: false,
            max_chunk_chars: 100,
            timeout_secs: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// CacheConfig
// ---------------------------------------------------------------------------

/// Layout of the on-disk audio artifacts.
///
/// Artifact `i` lives at `<dir>/<prefix>_<i>.<extension>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub dir: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: "paragraph".into(),
            extension: "mp3".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PlaybackConfig
// ---------------------------------------------------------------------------

/// Interactive playback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Description manifest (JSON).  `None` means `descriptions.json` in the
    /// config directory; when that file is missing too, labels are derived
    /// from the paragraph text.
    pub manifest_file: Option<PathBuf>,
    /// Pause between manifest lines, in milliseconds.
    pub display_delay_ms: u64,
    /// Pause after the "article processed" banner, in milliseconds.
    pub intro_delay_ms: u64,
    /// Extra time the output stream stays open after the last sample has
    /// been handed to the device, so the hardware buffer can drain.
    pub completion_tail_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            manifest_file: None,
            display_delay_ms: 500,
            intro_delay_ms: 1000,
            completion_tail_ms: 250,
        }
    }
}

impl PlaybackConfig {
    /// Resolve the manifest path, falling back to the config directory.
    pub fn manifest_path(&self, paths: &AppPaths) -> PathBuf {
        self.manifest_file
            .clone()
            .unwrap_or_else(|| paths.manifest_file.clone())
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use article_narrator::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language tag passed to the synthesizer (`"en"`, `"es"`, …).  Also
    /// selects the prompt language.
    pub language: String,
    /// Article download settings.
    pub source: SourceConfig,
    /// Speech synthesis settings.
    pub tts: TtsConfig,
    /// Artifact layout.
    pub cache: CacheConfig,
    /// Interactive playback settings.
    pub playback: PlaybackConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "en".into(),
            source: SourceConfig::default(),
            tts: TtsConfig::default(),
            cache: CacheConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns `true` when no `settings.toml` file exists yet.
    pub fn is_first_run() -> bool {
        !AppPaths::new().settings_file.exists()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
