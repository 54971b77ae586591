//! WAV file loading.

use std::path::Path;

use crate::buffer::AudioBuffer;
use crate::error::LoadError;

/// Minimum supported sample rate in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8_000;
/// Maximum supported sample rate in Hz.
pub const MAX_SAMPLE_RATE: u32 = 192_000;
/// Maximum supported channel count.
pub const MAX_CHANNELS: u16 = 8;

/// Loads a PCM WAV file into an [`AudioBuffer`].
///
/// The header is validated before any sample data is read: the file must be
/// a RIFF/WAVE container with a `fmt ` chunk describing integer PCM at a
/// supported bit depth, sample rate and channel count. Float WAVs are
/// rejected; this pipeline ingests PCM only.
///
/// # Arguments
/// * `path` - Path to the WAV file
///
/// # Returns
/// The decoded buffer, or a [`LoadError`] describing why the file was
/// rejected. The input file is never modified.
pub fn load<P: AsRef<Path>>(path: P) -> Result<AudioBuffer, LoadError> {
    let reader = hound::WavReader::open(path).map_err(map_hound_error)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int {
        return Err(LoadError::InvalidFormat {
            reason: "float sample format, expected integer PCM".to_string(),
        });
    }
    if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
        return Err(LoadError::UnsupportedBitDepth {
            bits: spec.bits_per_sample,
        });
    }
    if spec.channels == 0 {
        return Err(LoadError::InvalidFormat {
            reason: "zero channels".to_string(),
        });
    }
    if spec.channels > MAX_CHANNELS {
        return Err(LoadError::UnsupportedChannelCount {
            channels: spec.channels,
        });
    }
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&spec.sample_rate) {
        return Err(LoadError::UnsupportedSampleRate {
            rate: spec.sample_rate,
        });
    }
    if reader.duration() == 0 {
        return Err(LoadError::EmptyFile);
    }

    let samples = reader
        .into_samples::<i32>()
        .collect::<Result<Vec<i32>, hound::Error>>()
        .map_err(map_hound_error)?;

    // A truncated data chunk can leave a ragged final frame behind.
    if samples.len() % spec.channels as usize != 0 {
        return Err(LoadError::InvalidFormat {
            reason: "sample count is not a whole number of frames".to_string(),
        });
    }

    Ok(AudioBuffer {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bit_depth: spec.bits_per_sample,
    })
}

fn map_hound_error(err: hound::Error) -> LoadError {
    match err {
        hound::Error::IoError(io) => LoadError::Io(io),
        other => LoadError::InvalidFormat {
            reason: other.to_string(),
        },
    }
}
