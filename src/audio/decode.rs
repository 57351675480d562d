//! Audio file decoding via `symphonia`.
//!
//! Artifacts are decoded completely into memory before the output device is
//! acquired, so a corrupt or unreadable file fails without ever touching the
//! device.  Narrated paragraphs are short; a minute of 24 kHz mono audio is
//! under 6 MB of `f32`.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::device::PlaybackError;

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// A fully decoded audio file.
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            n => self.samples.len() / n as usize,
        }
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode the whole file at `path`.
///
/// The file extension is used as a format hint.  Corrupt packets are skipped;
/// any other decoder failure is returned.
///
/// # Errors
///
/// - [`PlaybackError::Open`]: the file cannot be opened.
/// - [`PlaybackError::Decode`]: the format is unsupported, there is no
///   audio track, or no frames could be decoded.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, PlaybackError> {
    let file = File::open(path).map_err(|source| PlaybackError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::Decode(format!("unrecognised format: {e}")))?;

    let mut format = probed.format;

    let (track_id, codec_params) = {
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| PlaybackError::Decode("no audio track found".into()))?;
        (track.id, track.codec_params.clone())
    };

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| PlaybackError::Decode(format!("unsupported codec: {e}")))?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels = codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);
    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                log::debug!("decode: skipping corrupt packet in {}: {e}", path.display());
            }
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        }
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(PlaybackError::Decode(format!(
            "no audio frames in {}",
            path.display()
        )));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: usize, value: i16) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
        for _ in 0..frames * channels as usize {
            writer.write_sample(value).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }

    #[test]
    fn decodes_mono_wav() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("tone.wav");
        write_wav(&path, 1, 8_000, 800, 16_384);

        let audio = decode_file(&path).expect("decode");

        assert_eq!(audio.sample_rate, 8_000);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.frames(), 800);
        assert!((audio.duration_secs() - 0.1).abs() < 1e-4);
        assert!(audio.samples.iter().all(|s| (s - 0.5).abs() < 1e-3));
    }

    #[test]
    fn decodes_stereo_wav() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, 16_000, 160, 0);

        let audio = decode_file(&path).expect("decode");

        assert_eq!(audio.channels, 2);
        assert_eq!(audio.samples.len(), 320);
        assert_eq!(audio.frames(), 160);
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempdir().expect("temp dir");
        let err = decode_file(&dir.path().join("paragraph_1.mp3")).unwrap_err();
        assert!(matches!(err, PlaybackError::Open { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("paragraph_1.txt");
        std::fs::write(&path, b"this is not audio at all").expect("write");

        let err = decode_file(&path).unwrap_err();
        assert!(matches!(err, PlaybackError::Decode(_)));
    }

    #[test]
    fn zero_channels_has_no_frames() {
        let audio = DecodedAudio {
            samples: vec![0.0; 4],
            sample_rate: 0,
            channels: 0,
        };
        assert_eq!(audio.frames(), 0);
        assert_eq!(audio.duration_secs(), 0.0);
    }
}
