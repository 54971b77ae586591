//! In-memory PCM audio buffers.

/// Interleaved PCM audio with its format descriptor.
///
/// Samples are stored as raw integer PCM values at `bit_depth` (so a 16-bit
/// buffer holds values in `-32768..=32767`). Positions and lengths on the
/// public API are always expressed in *frames*: one sample per channel at a
/// given time index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    /// Interleaved samples, `frame_count * channels` entries.
    pub samples: Vec<i32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Bits per sample (8, 16, 24 or 32).
    pub bit_depth: u16,
}

impl AudioBuffer {
    /// Creates a buffer of silent (zero) frames.
    pub fn silent(frames: usize, sample_rate: u32, channels: u16, bit_depth: u16) -> Self {
        Self {
            samples: vec![0; frames * channels as usize],
            sample_rate,
            channels,
            bit_depth,
        }
    }

    /// Number of frames (interleaved samples divided by channel count).
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Full-scale amplitude for this buffer's bit depth.
    pub fn full_scale(&self) -> f64 {
        (1i64 << (self.bit_depth - 1)) as f64
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// Converts a millisecond duration to a frame count at the given sample rate.
///
/// Truncates fractional frames: 1 ms at 44.1 kHz is 44 frames.
pub fn ms_to_frames(ms: u32, sample_rate: u32) -> usize {
    (ms as u64 * sample_rate as u64 / 1000) as usize
}

/// Human-readable channel layout description.
pub fn channel_description(channels: u16) -> String {
    match channels {
        1 => "mono".to_string(),
        2 => "stereo".to_string(),
        n => format!("{} channels", n),
    }
}
