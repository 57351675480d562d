//! Audio output: the `AudioDevice` trait and the cpal implementation.
//!
//! [`CpalAudioDevice::play`] follows a strict order:
//!
//! ```text
//! decode_file(path)            ← fails here for missing / corrupt files
//!   └─▶ query default output device + config
//!         └─▶ match_output (rate + channels)
//!               └─▶ OutputGuard::open      ← device acquired
//!                     └─▶ wait for Drained / Failed
//!                           └─▶ tail delay
//!                                 └─▶ drop(OutputGuard)  ← device released
//! ```
//!
//! The guard is an RAII value, so the stream is released on every exit path,
//! including early returns through `?` and stream errors.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use thiserror::Error;

use super::decode::decode_file;
use super::resample::match_output;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Errors that can occur while playing one artifact.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode audio: {0}")]
    Decode(String),

    #[error("no output device found on the default audio host")]
    NoDevice,

    #[error("failed to query default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported output sample format: {0}")]
    UnsupportedFormat(String),

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("audio stream stopped before playback finished")]
    Interrupted,
}

// ---------------------------------------------------------------------------
// AudioDevice trait
// ---------------------------------------------------------------------------

/// Blocking audio playback.
///
/// `play` returns once the file has been rendered completely or playback has
/// failed.  Implementations must release any output resource before
/// returning, whatever the outcome.
pub trait AudioDevice: Send + Sync {
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

// Compile-time assertion: Box<dyn AudioDevice> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioDevice>) {}
};

// ---------------------------------------------------------------------------
// OutputGuard
// ---------------------------------------------------------------------------

enum StreamEvent {
    Drained,
    Failed(String),
}

/// RAII guard that holds the output stream for one playback.
///
/// Dropping this value pauses and drops the underlying `cpal::Stream`, which
/// releases the device.
pub struct OutputGuard {
    stream: cpal::Stream,
    events: mpsc::Receiver<StreamEvent>,
}

impl OutputGuard {
    /// Open and start an output stream on `device` that plays `samples`
    /// (interleaved, already converted to the stream's rate and channels).
    pub fn open(
        device: &cpal::Device,
        supported: &cpal::SupportedStreamConfig,
        samples: Vec<f32>,
    ) -> Result<Self, PlaybackError> {
        let (tx, events) = mpsc::channel();
        let config = supported.config();

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(device, &config, samples, tx)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(device, &config, samples, tx)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(device, &config, samples, tx)?,
            other => return Err(PlaybackError::UnsupportedFormat(format!("{other:?}"))),
        };

        stream.play()?;
        log::debug!("audio: output stream acquired");

        Ok(Self { stream, events })
    }

    /// Block until every sample has been handed to the device or the stream
    /// reports an error.
    pub fn wait(&self) -> Result<(), PlaybackError> {
        match self.events.recv() {
            Ok(StreamEvent::Drained) => Ok(()),
            Ok(StreamEvent::Failed(message)) => Err(PlaybackError::Stream(message)),
            Err(_) => Err(PlaybackError::Interrupted),
        }
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if let Err(e) = self.stream.pause() {
            log::debug!("audio: pause on release failed: {e}");
        }
        log::debug!("audio: output stream released");
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Vec<f32>,
    tx: mpsc::Sender<StreamEvent>,
) -> Result<cpal::Stream, PlaybackError>
where
    T: SizedSample + FromSample<f32>,
{
    let err_tx = tx.clone();
    let mut cursor = 0usize;
    let mut signalled = false;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for out in data.iter_mut() {
                let sample = samples.get(cursor).copied().unwrap_or(0.0);
                if cursor < samples.len() {
                    cursor += 1;
                }
                *out = T::from_sample(sample);
            }
            if cursor >= samples.len() && !signalled {
                signalled = true;
                // Ignore send errors; the guard may already be gone.
                let _ = tx.send(StreamEvent::Drained);
            }
        },
        move |err: cpal::StreamError| {
            if is_fatal(&err) {
                log::error!("cpal stream error: {err}");
                let _ = err_tx.send(StreamEvent::Failed(err.to_string()));
            } else {
                log::warn!("cpal stream error (continuing): {err}");
            }
        },
        None, // no timeout
    )?;

    Ok(stream)
}

/// Only a vanished device ends playback; backend hiccups such as underruns
/// are logged and the stream keeps running.
fn is_fatal(err: &cpal::StreamError) -> bool {
    matches!(err, cpal::StreamError::DeviceNotAvailable)
}

// ---------------------------------------------------------------------------
// CpalAudioDevice
// ---------------------------------------------------------------------------

/// Plays artifacts on the system default output device.
///
/// The device is looked up and acquired afresh for every `play` call and
/// released before it returns; nothing is held between playbacks.
#[derive(Debug, Clone)]
pub struct CpalAudioDevice {
    tail: Duration,
}

impl CpalAudioDevice {
    /// `tail` is how long the stream stays open after the last sample has
    /// been queued, so the hardware buffer can finish playing.
    pub fn new(tail: Duration) -> Self {
        Self { tail }
    }
}

impl Default for CpalAudioDevice {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl AudioDevice for CpalAudioDevice {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        let audio = decode_file(path)?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlaybackError::NoDevice)?;
        let supported = device.default_output_config()?;

        let rate = supported.sample_rate().0;
        let channels = supported.channels();
        let samples = match_output(&audio, rate, channels);

        log::info!(
            "audio: playing {} ({:.1} s, {} Hz → {} Hz, {} ch)",
            path.display(),
            audio.duration_secs(),
            audio.sample_rate,
            rate,
            channels
        );

        let guard = OutputGuard::open(&device, &supported, samples)?;
        guard.wait()?;
        std::thread::sleep(self.tail);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockAudioDevice (test double)
// ---------------------------------------------------------------------------

/// Records every path it is asked to play; optionally fails the first
/// `n` calls.
#[cfg(test)]
pub struct MockAudioDevice {
    failures_left: std::sync::Mutex<usize>,
    played: std::sync::Mutex<Vec<PathBuf>>,
}

#[cfg(test)]
impl MockAudioDevice {
    pub fn ok() -> Self {
        Self::failing_first(0)
    }

    /// Fail every call.
    pub fn failing() -> Self {
        Self::failing_first(usize::MAX)
    }

    /// Fail the first `n` calls, then succeed.
    pub fn failing_first(n: usize) -> Self {
        Self {
            failures_left: std::sync::Mutex::new(n),
            played: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Paths passed to `play`, in call order.
    pub fn played(&self) -> Vec<PathBuf> {
        self.played.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl AudioDevice for MockAudioDevice {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        self.played.lock().unwrap().push(path.to_path_buf());
        let mut left = self.failures_left.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(PlaybackError::Stream("device unplugged".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_fails_before_touching_the_device() {
        let dir = tempdir().expect("temp dir");
        let device = CpalAudioDevice::default();
        let err = device
            .play(&dir.path().join("paragraph_9.mp3"))
            .unwrap_err();
        assert!(matches!(err, PlaybackError::Open { .. }));
    }

    #[test]
    fn corrupt_file_fails_before_touching_the_device() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("paragraph_1.mp3");
        std::fs::write(&path, b"").expect("write");

        let err = CpalAudioDevice::default().play(&path).unwrap_err();
        assert!(matches!(err, PlaybackError::Decode(_)));
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(
            PlaybackError::NoDevice.to_string(),
            "no output device found on the default audio host"
        );
        assert_eq!(
            PlaybackError::Stream("underrun".into()).to_string(),
            "audio stream error: underrun"
        );
    }

    #[test]
    fn only_a_lost_device_ends_playback() {
        assert!(is_fatal(&cpal::StreamError::DeviceNotAvailable));

        let underrun = cpal::StreamError::BackendSpecific {
            err: cpal::BackendSpecificError {
                description: "underrun".into(),
            },
        };
        assert!(!is_fatal(&underrun));
    }

    #[test]
    fn mock_fails_only_the_first_calls() {
        let device = MockAudioDevice::failing_first(1);
        assert!(device.play(Path::new("paragraph_1.mp3")).is_err());
        assert!(device.play(Path::new("paragraph_1.mp3")).is_ok());
        assert_eq!(device.played().len(), 2);
    }

    #[test]
    fn cpal_device_is_object_safe() {
        let device: Box<dyn AudioDevice> = Box::new(CpalAudioDevice::default());
        drop(device);
    }
}
