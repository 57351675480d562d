//! Audio playback: artifact file → decoder → rate/channel conversion → device.
//!
//! # Pipeline
//!
//! ```text
//! paragraph_<i>.mp3 → decode_file (symphonia) → match_output
//!                   → OutputGuard (cpal output stream) → speakers
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use article_narrator::audio::{AudioDevice, CpalAudioDevice};
//!
//! let device = CpalAudioDevice::default();
//! // Blocks until the clip has finished; the device is released afterwards.
//! device.play(Path::new("paragraph_1.mp3")).unwrap();
//! ```

pub mod decode;
pub mod device;
pub mod resample;

pub use decode::{decode_file, DecodedAudio};
pub use device::{AudioDevice, CpalAudioDevice, OutputGuard, PlaybackError};
pub use resample::{downmix_to_mono, fan_out, match_output, resample_linear};

#[cfg(test)]
pub use device::MockAudioDevice;
