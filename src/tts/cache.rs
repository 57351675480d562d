//! Idempotent paragraph → audio artifact cache.
//!
//! [`SynthesisCache::ensure_artifacts`] walks the paragraphs in order and
//! makes sure each one has an audio file on disk:
//!
//! ```text
//! paragraph i ──▶ ArtifactNaming::path_for(i)
//!                   ├─ file exists  → cache hit, synthesizer not called
//!                   └─ missing      → synthesize → write <path>.part → rename
//!                                       └─ error → logged, not counted
//! ```
//!
//! The file name depends on the index alone, so two runs over the same
//! document always agree on naming and the second run makes no synthesis
//! calls.  Artifacts are never overwritten.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::CacheConfig;
use crate::content::Paragraph;
use crate::tts::synthesizer::{SpeechSynthesizer, SynthError};

// ---------------------------------------------------------------------------
// ArtifactNaming
// ---------------------------------------------------------------------------

/// Maps a paragraph index to its artifact path: `<dir>/<prefix>_<index>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNaming {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl ArtifactNaming {
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(&config.dir, &config.prefix, &config.extension)
    }

    /// Deterministic artifact path for paragraph `index`.
    ///
    /// ```
    /// use std::path::Path;
    /// use article_narrator::tts::ArtifactNaming;
    ///
    /// let naming = ArtifactNaming::new(".", "paragraph", "mp3");
    /// assert_eq!(naming.path_for(7), Path::new("./paragraph_7.mp3"));
    /// ```
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", self.prefix, index, self.extension))
    }

    /// Resolve paragraph `index` to an [`AudioArtifact`], checking storage.
    pub fn artifact(&self, index: usize) -> AudioArtifact {
        let path = self.path_for(index);
        let present = path.is_file();
        AudioArtifact {
            index,
            path,
            present,
        }
    }

    /// Directory holding the artifacts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for ArtifactNaming {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

// ---------------------------------------------------------------------------
// AudioArtifact
// ---------------------------------------------------------------------------

/// A synthesized audio file for one paragraph.
///
/// `present` records whether the file existed when the artifact was resolved;
/// it is a snapshot and is not updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub index: usize,
    pub path: PathBuf,
    pub present: bool,
}

// ---------------------------------------------------------------------------
// CacheError / CacheOutcome
// ---------------------------------------------------------------------------

/// Why a single paragraph has no artifact after the cache pass.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("synthesis failed: {0}")]
    Synth(#[from] SynthError),

    #[error("cannot write artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of ensuring one paragraph's artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The artifact already existed; nothing was synthesized.
    Hit,
    /// The artifact was synthesized and written during this call.
    Created,
}

// ---------------------------------------------------------------------------
// SynthesisCache
// ---------------------------------------------------------------------------

/// Ensures every paragraph has an audio artifact, synthesizing only the
/// missing ones.
pub struct SynthesisCache {
    naming: ArtifactNaming,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl SynthesisCache {
    pub fn new(naming: ArtifactNaming, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            naming,
            synthesizer,
        }
    }

    /// Make sure an artifact exists for each paragraph and return how many
    /// are confirmed present (cache hits plus newly created files).
    ///
    /// Paragraphs are processed one at a time, in order.  Blank paragraphs
    /// are skipped.  A failure for one paragraph is logged and leaves that
    /// artifact absent; it never aborts the pass.
    ///
    /// `on_progress` is called in paragraph order with the index, artifact
    /// path and outcome of every paragraph that ends up with an artifact.
    pub async fn ensure_artifacts<F>(
        &self,
        paragraphs: &[Paragraph],
        language: &str,
        mut on_progress: F,
    ) -> usize
    where
        F: FnMut(usize, &Path, CacheOutcome),
    {
        let mut hits = 0usize;
        let mut created = 0usize;
        let mut failed = 0usize;

        for paragraph in paragraphs {
            if paragraph.is_blank() {
                log::debug!("cache: paragraph {} is blank, skipping", paragraph.index);
                continue;
            }

            match self.ensure_one(paragraph, language).await {
                Ok(outcome) => {
                    match outcome {
                        CacheOutcome::Hit => hits += 1,
                        CacheOutcome::Created => created += 1,
                    }
                    let path = self.naming.path_for(paragraph.index);
                    on_progress(paragraph.index, &path, outcome);
                }
                Err(e) => {
                    failed += 1;
                    log::warn!("cache: paragraph {} has no audio: {e}", paragraph.index);
                }
            }
        }

        log::info!("cache: {created} created, {hits} already present, {failed} failed");
        hits + created
    }

    /// Ensure the artifact for a single paragraph.
    pub async fn ensure_one(
        &self,
        paragraph: &Paragraph,
        language: &str,
    ) -> Result<CacheOutcome, CacheError> {
        let artifact = self.naming.artifact(paragraph.index);

        if artifact.present {
            log::info!(
                "The file '{}' already exists. It will not be regenerated.",
                artifact.path.display()
            );
            return Ok(CacheOutcome::Hit);
        }

        let audio = self
            .synthesizer
            .synthesize(&paragraph.text, language)
            .await?;
        if audio.is_empty() {
            return Err(SynthError::EmptyAudio.into());
        }

        write_atomically(&artifact.path, &audio).await?;
        log::info!(
            "Paragraph {} has been saved as '{}'",
            paragraph.index,
            artifact.path.display()
        );
        Ok(CacheOutcome::Created)
    }
}

/// Write `bytes` to a `.part` sibling of `path`, then rename it into place,
/// so an interrupted write never looks like a finished artifact.
async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    if let Err(e) = tokio::fs::write(&part, bytes).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(e);
    }
    tokio::fs::rename(&part, path).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Locale;
    use crate::tts::MockSynthesizer;
    use tempfile::tempdir;

    fn paragraphs(texts: &[&str]) -> Vec<Paragraph> {
        Paragraph::number(texts.iter().copied())
    }

    fn quiet(_: usize, _: &Path, _: CacheOutcome) {}

    fn cache_in(dir: &Path, synth: Arc<MockSynthesizer>) -> SynthesisCache {
        SynthesisCache::new(ArtifactNaming::new(dir, "paragraph", "mp3"), synth)
    }

    #[test]
    fn naming_depends_only_on_index() {
        let a = ArtifactNaming::new("out", "paragraph", "mp3");
        let b = ArtifactNaming::new("out", "paragraph", "mp3");
        for i in 1..=50 {
            assert_eq!(a.path_for(i), b.path_for(i));
        }
        assert_eq!(a.path_for(3), Path::new("out").join("paragraph_3.mp3"));
        assert_ne!(a.path_for(1), a.path_for(11));
    }

    #[test]
    fn artifact_reports_presence() {
        let dir = tempdir().expect("temp dir");
        let naming = ArtifactNaming::new(dir.path(), "paragraph", "mp3");
        assert!(!naming.artifact(1).present);

        std::fs::write(naming.path_for(1), b"x").expect("write");
        let artifact = naming.artifact(1);
        assert!(artifact.present);
        assert_eq!(artifact.index, 1);
    }

    #[tokio::test]
    async fn creates_one_file_per_paragraph() {
        let dir = tempdir().expect("temp dir");
        let synth = Arc::new(MockSynthesizer::ok(b"mp3-bytes"));
        let cache = cache_in(dir.path(), Arc::clone(&synth));

        let total = cache.ensure_artifacts(&paragraphs(&["A", "B", "C"]), "en", quiet).await;

        assert_eq!(total, 3);
        for i in 1..=3 {
            let path = dir.path().join(format!("paragraph_{i}.mp3"));
            assert_eq!(std::fs::read(&path).expect("artifact"), b"mp3-bytes");
        }
        let texts: Vec<String> = synth.calls().into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn second_pass_makes_no_synthesis_calls() {
        let dir = tempdir().expect("temp dir");
        let first = Arc::new(MockSynthesizer::ok(b"audio"));
        let input = paragraphs(&["A", "B", "C"]);

        let total_first = cache_in(dir.path(), first)
            .ensure_artifacts(&input, "en", quiet)
            .await;

        let second = Arc::new(MockSynthesizer::ok(b"other"));
        let total_second = cache_in(dir.path(), Arc::clone(&second))
            .ensure_artifacts(&input, "en", quiet)
            .await;

        assert_eq!(total_first, total_second);
        assert!(second.calls().is_empty());
        // Existing artifacts are never overwritten.
        let bytes = std::fs::read(dir.path().join("paragraph_2.mp3")).unwrap();
        assert_eq!(bytes, b"audio");
    }

    #[tokio::test]
    async fn failed_paragraph_is_not_counted() {
        let dir = tempdir().expect("temp dir");
        let synth = Arc::new(MockSynthesizer::ok(b"audio").failing_on("B"));
        let cache = cache_in(dir.path(), synth);

        let total = cache.ensure_artifacts(&paragraphs(&["A", "B", "C"]), "en", quiet).await;

        assert_eq!(total, 2);
        assert!(dir.path().join("paragraph_1.mp3").is_file());
        assert!(!dir.path().join("paragraph_2.mp3").exists());
        assert!(!dir.path().join("paragraph_2.mp3.part").exists());
        assert!(dir.path().join("paragraph_3.mp3").is_file());
    }

    #[tokio::test]
    async fn empty_audio_is_a_failure() {
        let dir = tempdir().expect("temp dir");
        let cache = cache_in(dir.path(), Arc::new(MockSynthesizer::ok(b"")));

        let total = cache.ensure_artifacts(&paragraphs(&["A"]), "en", quiet).await;

        assert_eq!(total, 0);
        assert!(!dir.path().join("paragraph_1.mp3").exists());
    }

    #[tokio::test]
    async fn blank_paragraphs_are_skipped() {
        let dir = tempdir().expect("temp dir");
        let synth = Arc::new(MockSynthesizer::ok(b"audio"));
        let cache = cache_in(dir.path(), Arc::clone(&synth));

        let input = vec![
            Paragraph { index: 1, text: "A".into() },
            Paragraph { index: 2, text: "   ".into() },
        ];
        let total = cache.ensure_artifacts(&input, "en", quiet).await;

        assert_eq!(total, 1);
        assert_eq!(synth.calls().len(), 1);
        assert!(!dir.path().join("paragraph_2.mp3").exists());
    }

    #[tokio::test]
    async fn progress_is_reported_in_paragraph_order() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(dir.path().join("paragraph_1.mp3"), b"old").unwrap();
        let cache = cache_in(dir.path(), Arc::new(MockSynthesizer::ok(b"audio")));
        let locale = Locale::English;

        let mut lines = Vec::new();
        let total = cache
            .ensure_artifacts(&paragraphs(&["A", "B"]), "en", |index, path, outcome| {
                lines.push(locale.cache_progress(index, path, outcome));
            })
            .await;

        assert_eq!(total, 2);
        let first = dir.path().join("paragraph_1.mp3");
        let second = dir.path().join("paragraph_2.mp3");
        assert_eq!(
            lines,
            vec![
                format!(
                    "The file '{}' already exists. It will not be regenerated.",
                    first.display()
                ),
                format!("Paragraph 2 has been saved as '{}'", second.display()),
            ]
        );
    }

    #[tokio::test]
    async fn failed_paragraphs_report_no_progress() {
        let dir = tempdir().expect("temp dir");
        let synth = Arc::new(MockSynthesizer::ok(b"audio").failing_on("B"));
        let cache = cache_in(dir.path(), synth);

        let mut seen = Vec::new();
        cache
            .ensure_artifacts(&paragraphs(&["A", "B", "C"]), "en", |index, _, outcome| {
                seen.push((index, outcome));
            })
            .await;

        assert_eq!(
            seen,
            vec![(1, CacheOutcome::Created), (3, CacheOutcome::Created)]
        );
    }

    #[tokio::test]
    async fn language_tag_is_passed_through() {
        let dir = tempdir().expect("temp dir");
        let synth = Arc::new(MockSynthesizer::ok(b"audio"));
        let cache = cache_in(dir.path(), Arc::clone(&synth));

        cache.ensure_artifacts(&paragraphs(&["Hola"]), "es", quiet).await;

        assert_eq!(synth.calls(), vec![("Hola".to_string(), "es".to_string())]);
    }

    #[tokio::test]
    async fn creates_missing_cache_directory() {
        let dir = tempdir().expect("temp dir");
        let nested = dir.path().join("audio").join("article");
        let cache = cache_in(&nested, Arc::new(MockSynthesizer::ok(b"audio")));

        let outcome = cache
            .ensure_one(&Paragraph { index: 4, text: "D".into() }, "en")
            .await
            .unwrap();

        assert_eq!(outcome, CacheOutcome::Created);
        assert!(nested.join("paragraph_4.mp3").is_file());
    }
}
