//! Sample-rate and channel conversion for playback.
//!
//! Decoded artifacts rarely match the output device: Google's speech comes
//! back as 24 kHz mono, while most devices run at 44.1 or 48 kHz stereo.
//! [`match_output`] bridges the two in three steps:
//!
//! 1. [`downmix_to_mono`]: average interleaved channels.
//! 2. [`resample_linear`]: linear-interpolation resampling.
//! 3. [`fan_out`]: copy the mono signal to every output channel.
//!
//! When rate and channel count already match, the samples pass through
//! unchanged.

use super::decode::DecodedAudio;

// ---------------------------------------------------------------------------
// downmix_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all channels.
///
/// * `channels == 1` returns the input as an owned `Vec`.
/// * `channels == 0` returns an empty vector.
///
/// ```rust
/// use article_narrator::audio::downmix_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, 0.4]; // L R L R
/// let mono = downmix_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// assert!((mono[1] - 0.3).abs() < 1e-6);
/// ```
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample_linear
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` to `target_rate` Hz using
/// linear interpolation.
///
/// * Equal rates return the input unchanged.
/// * Empty input or a zero rate returns an empty vector.
///
/// The output length is `ceil(samples.len() * target_rate / source_rate)`.
///
/// ```rust
/// use article_narrator::audio::resample_linear;
///
/// // 24 kHz → 48 kHz doubles the length
/// let out = resample_linear(&vec![0.25_f32; 240], 24_000, 48_000);
/// assert_eq!(out.len(), 480);
/// ```
pub fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }

    if samples.is_empty() || source_rate == 0 || target_rate == 0 {
        return Vec::new();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len =
        (samples.len() as u64 * target_rate as u64).div_ceil(source_rate as u64) as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        let sample = if idx + 1 < samples.len() {
            samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ---------------------------------------------------------------------------
// fan_out
// ---------------------------------------------------------------------------

/// Interleave a mono signal into `channels` identical channels.
pub fn fan_out(mono: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => mono.to_vec(),
        n => mono
            .iter()
            .flat_map(|&s| std::iter::repeat(s).take(n as usize))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// match_output
// ---------------------------------------------------------------------------

/// Convert `audio` to interleaved samples at `rate` Hz with `channels`
/// channels, ready to hand to the output stream.
pub fn match_output(audio: &DecodedAudio, rate: u32, channels: u16) -> Vec<f32> {
    if audio.sample_rate == rate && audio.channels == channels {
        return audio.samples.clone();
    }

    let mono = downmix_to_mono(&audio.samples, audio.channels);
    let resampled = resample_linear(&mono, audio.sample_rate, rate);
    fan_out(&resampled, channels)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- downmix_to_mono ---------------------------------------------------

    #[test]
    fn downmix_already_mono() {
        let input = vec![0.1_f32, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&input, 1), input);
    }

    #[test]
    fn downmix_two_channel() {
        let out = downmix_to_mono(&[1.0_f32, -1.0, 0.5, 0.5], 2);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn downmix_zero_channels() {
        assert!(downmix_to_mono(&[1.0_f32, 2.0], 0).is_empty());
    }

    // ---- resample_linear ---------------------------------------------------

    #[test]
    fn resample_same_rate_is_noop() {
        let input: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        assert_eq!(resample_linear(&input, 44_100, 44_100), input);
    }

    #[test]
    fn resample_empty_input() {
        assert!(resample_linear(&[], 24_000, 48_000).is_empty());
    }

    #[test]
    fn resample_zero_rate() {
        assert!(resample_linear(&[0.1, 0.2], 0, 48_000).is_empty());
    }

    #[test]
    fn resample_24k_to_44k1_length() {
        // 1 s @ 24 kHz → 1 s @ 44.1 kHz
        let out = resample_linear(&vec![0.0_f32; 24_000], 24_000, 44_100);
        assert_eq!(out.len(), 44_100);
    }

    #[test]
    fn resample_downsample_length() {
        let out = resample_linear(&vec![0.0_f32; 480], 48_000, 16_000);
        assert_eq!(out.len(), 160);
    }

    #[test]
    fn resample_constant_signal_preserves_amplitude() {
        let out = resample_linear(&vec![0.5_f32; 240], 24_000, 48_000);
        for &s in &out {
            assert!((s - 0.5).abs() < 1e-5, "amplitude drift: {s}");
        }
    }

    #[test]
    fn resample_interpolates_between_samples() {
        // Doubling the rate puts a midpoint between each pair.
        let out = resample_linear(&[0.0_f32, 1.0], 1_000, 2_000);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    // ---- fan_out -----------------------------------------------------------

    #[test]
    fn fan_out_duplicates_frames() {
        assert_eq!(fan_out(&[0.1, 0.2], 2), vec![0.1, 0.1, 0.2, 0.2]);
        assert_eq!(fan_out(&[0.1, 0.2], 1), vec![0.1, 0.2]);
        assert!(fan_out(&[0.1], 0).is_empty());
    }

    // ---- match_output ------------------------------------------------------

    #[test]
    fn match_output_passthrough() {
        let audio = DecodedAudio {
            samples: vec![0.1, 0.2, 0.3, 0.4],
            sample_rate: 48_000,
            channels: 2,
        };
        assert_eq!(match_output(&audio, 48_000, 2), audio.samples);
    }

    #[test]
    fn match_output_mono_24k_to_stereo_48k() {
        let audio = DecodedAudio {
            samples: vec![0.25; 240],
            sample_rate: 24_000,
            channels: 1,
        };
        let out = match_output(&audio, 48_000, 2);
        assert_eq!(out.len(), 480 * 2);
        assert!(out.iter().all(|s| (s - 0.25).abs() < 1e-5));
    }
}
