//! Application entry point for Article Narrator.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (writes the defaults on first run).
//! 3. Create a current-thread [`tokio`] runtime for the network stages.
//! 4. Fetch the article and split it into paragraphs.
//! 5. Ensure one speech artifact per paragraph (cache hits are reused).
//! 6. Load the description manifest, or derive it from the paragraphs.
//! 7. Run the interactive [`PlaybackController`] on stdin/stdout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use article_narrator::{
    audio::{AudioDevice, CpalAudioDevice},
    config::{AppConfig, AppPaths},
    content::{fetch_paragraphs, source_for, FetchError},
    pipeline::{Locale, Manifest, PlaybackController},
    tts::{ArtifactNaming, GoogleTranslateTts, SpeechSynthesizer, SynthesisCache},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    log::info!("Article Narrator starting up");

    // 2. Config
    let paths = AppPaths::new();
    let first_run = AppConfig::is_first_run();
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if first_run {
        match config.save() {
            Ok(()) => log::info!("Wrote default settings to {}", paths.settings_file.display()),
            Err(e) => log::warn!("Could not write default settings: {e}"),
        }
    }
    let locale = Locale::for_tag(&config.language);

    // 3. Tokio runtime; the controller itself is synchronous.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Fetch
    println!("{}", locale.processing());
    let source = source_for(&config.source);
    let paragraphs = match rt.block_on(fetch_paragraphs(source.as_ref(), &config.source.url)) {
        Ok(paragraphs) => paragraphs,
        Err(e) => {
            if matches!(e, FetchError::NoContent) {
                println!("{}", locale.no_content());
            }
            return Err(e).with_context(|| format!("cannot load {}", config.source.url));
        }
    };
    log::info!("{} paragraphs extracted", paragraphs.len());

    // 5. Synthesis cache
    let naming = ArtifactNaming::from_config(&config.cache);
    let synthesizer: Arc<dyn SpeechSynthesizer> =
        Arc::new(GoogleTranslateTts::from_config(&config.tts));
    let cache = SynthesisCache::new(naming.clone(), synthesizer);
    let total_generated = rt.block_on(cache.ensure_artifacts(
        &paragraphs,
        &config.language,
        |index, path, outcome| println!("{}", locale.cache_progress(index, path, outcome)),
    ));
    log::info!(
        "{total_generated} of {} artifacts available in {}",
        paragraphs.len(),
        naming.dir().display()
    );

    println!();
    println!("{}", locale.processed());
    std::thread::sleep(Duration::from_millis(config.playback.intro_delay_ms));

    // 6. Manifest
    let manifest = Manifest::load_or_derive(&config.playback.manifest_path(&paths), &paragraphs);

    // 7. Interactive playback
    let device: Arc<dyn AudioDevice> = Arc::new(CpalAudioDevice::new(Duration::from_millis(
        config.playback.completion_tail_ms,
    )));
    let mut controller = PlaybackController::new(paragraphs, total_generated, naming, device)
        .with_locale(locale)
        .with_manifest(manifest)
        .with_display_delay(Duration::from_millis(config.playback.display_delay_ms));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    controller
        .run(stdin.lock(), stdout.lock())
        .context("terminal I/O failed")?;

    log::info!("Article Narrator shutting down");
    Ok(())
}
