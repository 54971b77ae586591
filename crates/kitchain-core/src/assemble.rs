//! Kit assembly: concatenation with slice markers.
//!
//! Samples are appended with a fixed-duration silent marker before each one
//! and a trailing marker after the last. The frame offset of each sample's
//! first audio frame is recorded as it is appended. Positions are always
//! `total_interleaved_samples / channels` - frame units, never the raw
//! interleaved sample count, so stereo and multi-channel kits slice at the
//! same places mono kits do.

use crate::buffer::{ms_to_frames, AudioBuffer};
use crate::config::KitConfig;
use crate::error::ProcessingError;

/// Frame offset of one input sample inside the assembled kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceMarker {
    /// Zero-based index of the source file.
    pub source_index: usize,
    /// Frame offset of the sample's first audio frame.
    pub frame_position: u64,
}

/// The assembled kit: concatenated audio plus one marker per input.
#[derive(Debug, Clone)]
pub struct KitAssembly {
    /// The concatenated buffer.
    pub buffer: AudioBuffer,
    /// One marker per input, in strictly increasing frame order.
    pub markers: Vec<SliceMarker>,
}

/// Incremental kit assembler.
///
/// Buffers are pushed one at a time so callers can report progress between
/// files; [`assemble`] wraps this for the common all-at-once case.
#[derive(Debug)]
pub struct Assembler {
    marker_duration_ms: u32,
    target_channels: Option<u16>,
    format: Option<KitFormat>,
    samples: Vec<i32>,
    markers: Vec<SliceMarker>,
    pushed: usize,
}

#[derive(Debug, Clone, Copy)]
struct KitFormat {
    sample_rate: u32,
    channels: u16,
    bit_depth: u16,
    marker_frames: usize,
}

impl Assembler {
    /// Creates an assembler for the given configuration.
    pub fn new(config: &KitConfig) -> Self {
        Self {
            marker_duration_ms: config.marker_duration_ms,
            target_channels: config.target_channels,
            format: None,
            samples: Vec::new(),
            markers: Vec::new(),
            pushed: 0,
        }
    }

    /// Appends one sample to the kit: marker first, then the audio, with a
    /// slice marker recorded at the audio's first frame.
    ///
    /// The first push fixes the kit's sample rate, bit depth and channel
    /// count (the latter overridable via the config); later buffers are
    /// normalized to match. Mismatched channel counts are duplicated or
    /// averaged, never truncated.
    pub fn push(&mut self, buffer: &AudioBuffer) -> Result<(), ProcessingError> {
        let index = self.pushed;
        if buffer.channels == 0 {
            return Err(ProcessingError::ChannelMismatch {
                source_index: index,
            });
        }

        let format = match self.format {
            Some(format) => {
                if buffer.sample_rate != format.sample_rate {
                    return Err(ProcessingError::SampleRateMismatch {
                        source_index: index,
                        expected: format.sample_rate,
                        found: buffer.sample_rate,
                    });
                }
                format
            }
            None => {
                let channels = self.target_channels.unwrap_or(buffer.channels);
                if channels == 0 {
                    return Err(ProcessingError::ChannelMismatch {
                        source_index: index,
                    });
                }
                let format = KitFormat {
                    sample_rate: buffer.sample_rate,
                    channels,
                    bit_depth: buffer.bit_depth,
                    marker_frames: ms_to_frames(self.marker_duration_ms, buffer.sample_rate),
                };
                self.format = Some(format);
                format
            }
        };

        self.append_marker(format);

        // Frame units at every position-recording site.
        let frame_position = (self.samples.len() / format.channels as usize) as u64;
        self.markers.push(SliceMarker {
            source_index: index,
            frame_position,
        });

        let normalized = normalize_channels(&buffer.samples, buffer.channels, format.channels);
        if buffer.bit_depth == format.bit_depth {
            self.samples.extend_from_slice(&normalized);
        } else {
            let shift = format.bit_depth as i32 - buffer.bit_depth as i32;
            self.samples
                .extend(normalized.iter().map(|&s| rescale(s, shift)));
        }

        self.pushed += 1;
        Ok(())
    }

    /// Appends the trailing marker and returns the assembled kit, or `None`
    /// if nothing was pushed.
    pub fn finish(mut self) -> Option<KitAssembly> {
        let format = self.format?;
        self.append_marker(format);
        Some(KitAssembly {
            buffer: AudioBuffer {
                samples: self.samples,
                sample_rate: format.sample_rate,
                channels: format.channels,
                bit_depth: format.bit_depth,
            },
            markers: self.markers,
        })
    }

    fn append_marker(&mut self, format: KitFormat) {
        self.samples
            .extend(std::iter::repeat(0).take(format.marker_frames * format.channels as usize));
    }
}

/// Assembles a sequence of buffers into a kit in one call.
pub fn assemble(
    buffers: &[AudioBuffer],
    config: &KitConfig,
) -> Result<KitAssembly, ProcessingError> {
    let mut assembler = Assembler::new(config);
    for buffer in buffers {
        assembler.push(buffer)?;
    }
    assembler.finish().ok_or(ProcessingError::EmptyKit)
}

/// Maps interleaved samples from `src` channels to `dst` channels.
///
/// Upmixing duplicates source channels cyclically; downmixing averages the
/// source channels that fold onto each destination channel.
fn normalize_channels(samples: &[i32], src: u16, dst: u16) -> Vec<i32> {
    if src == dst {
        return samples.to_vec();
    }
    let src = src as usize;
    let dst = dst as usize;
    let frames = samples.len() / src;
    let mut out = Vec::with_capacity(frames * dst);

    for f in 0..frames {
        let frame = &samples[f * src..(f + 1) * src];
        for d in 0..dst {
            if dst > src {
                out.push(frame[d % src]);
            } else {
                let mut sum: i64 = 0;
                let mut count: i64 = 0;
                let mut c = d;
                while c < src {
                    sum += frame[c] as i64;
                    count += 1;
                    c += dst;
                }
                out.push((sum / count) as i32);
            }
        }
    }
    out
}

/// Shifts a sample between bit depths, preserving sign.
fn rescale(sample: i32, shift: i32) -> i32 {
    if shift >= 0 {
        sample << shift
    } else {
        sample >> (-shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mono(frames: usize, sample_rate: u32) -> AudioBuffer {
        AudioBuffer {
            samples: vec![1000; frames],
            sample_rate,
            channels: 1,
            bit_depth: 16,
        }
    }

    fn config() -> KitConfig {
        KitConfig {
            retained_silence_ms: 0,
            ..KitConfig::default()
        }
    }

    #[test]
    fn marker_positions_for_two_mono_files() {
        // 1 ms at 44.1 kHz is a 44-frame marker: layout is
        // marker(44) file(100) marker(44) file(200) marker(44).
        let kit = assemble(&[mono(100, 44100), mono(200, 44100)], &config()).unwrap();

        let positions: Vec<u64> = kit.markers.iter().map(|m| m.frame_position).collect();
        assert_eq!(positions, vec![44, 188]);
        assert_eq!(kit.buffer.frame_count(), 44 + 100 + 44 + 200 + 44);
    }

    #[test]
    fn stereo_positions_are_frames_not_samples() {
        // One second of stereo audio is 88200 interleaved samples but only
        // 44100 frames; the marker position must use frame units.
        let stereo = AudioBuffer {
            samples: vec![1000; 2 * 44100],
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
        };
        let kit = assemble(&[stereo], &config()).unwrap();

        assert_eq!(kit.markers.len(), 1);
        assert_eq!(kit.markers[0].frame_position, 44);
        assert_eq!(kit.buffer.frame_count(), 44 + 44100 + 44);
    }

    #[test]
    fn positions_match_for_all_channel_counts() {
        for channels in [1u16, 2, 6] {
            let buffers: Vec<AudioBuffer> = (0..3)
                .map(|_| AudioBuffer {
                    samples: vec![500; 100 * channels as usize],
                    sample_rate: 44100,
                    channels,
                    bit_depth: 16,
                })
                .collect();
            let kit = assemble(&buffers, &config()).unwrap();

            let positions: Vec<u64> = kit.markers.iter().map(|m| m.frame_position).collect();
            assert_eq!(positions, vec![44, 188, 332], "channels = {}", channels);
        }
    }

    #[test]
    fn markers_strictly_increase_and_cover_every_input() {
        let buffers: Vec<AudioBuffer> = (1..=10).map(|i| mono(i * 10, 44100)).collect();
        let kit = assemble(&buffers, &config()).unwrap();

        assert_eq!(kit.markers.len(), 10);
        for pair in kit.markers.windows(2) {
            assert!(pair[0].frame_position < pair[1].frame_position);
        }
        for (i, marker) in kit.markers.iter().enumerate() {
            assert_eq!(marker.source_index, i);
        }
    }

    #[test]
    fn mono_input_is_upmixed_to_stereo_kit() {
        let stereo = AudioBuffer {
            samples: vec![1, 2, 3, 4],
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
        };
        let kit = assemble(&[stereo, mono(3, 44100)], &config()).unwrap();

        assert_eq!(kit.buffer.channels, 2);
        // marker(44) + 2 + marker(44) + 3 + marker(44) frames
        assert_eq!(kit.buffer.frame_count(), 44 * 3 + 2 + 3);
        // The mono samples appear duplicated in both channels.
        let start = (44 + 2 + 44) * 2;
        assert_eq!(&kit.buffer.samples[start..start + 6], &[1000, 1000, 1000, 1000, 1000, 1000]);
    }

    #[test]
    fn stereo_input_is_averaged_to_mono_kit() {
        let stereo = AudioBuffer {
            samples: vec![100, 300, -100, -300],
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
        };
        let kit = assemble(&[mono(1, 44100), stereo], &config()).unwrap();

        assert_eq!(kit.buffer.channels, 1);
        let start = 44 + 1 + 44;
        assert_eq!(&kit.buffer.samples[start..start + 2], &[200, -200]);
    }

    #[test]
    fn forced_channel_count_applies_to_first_file_too() {
        let cfg = KitConfig {
            target_channels: Some(1),
            retained_silence_ms: 0,
            ..KitConfig::default()
        };
        let stereo = AudioBuffer {
            samples: vec![100, 200],
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
        };
        let kit = assemble(&[stereo], &cfg).unwrap();
        assert_eq!(kit.buffer.channels, 1);
        assert_eq!(kit.buffer.samples[44], 150);
    }

    #[test]
    fn sample_rate_mismatch_is_rejected() {
        let err = assemble(&[mono(10, 44100), mono(10, 48000)], &config()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::SampleRateMismatch {
                source_index: 1,
                expected: 44100,
                found: 48000,
            }
        ));
    }

    #[test]
    fn zero_channel_buffer_is_rejected() {
        let broken = AudioBuffer {
            samples: vec![],
            sample_rate: 44100,
            channels: 0,
            bit_depth: 16,
        };
        let err = assemble(&[broken], &config()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::ChannelMismatch { source_index: 0 }
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            assemble(&[], &config()),
            Err(ProcessingError::EmptyKit)
        ));
    }

    #[test]
    fn mixed_bit_depths_rescale_to_first_file() {
        let deep = AudioBuffer {
            samples: vec![1000 << 8; 5],
            sample_rate: 44100,
            channels: 1,
            bit_depth: 24,
        };
        let kit = assemble(&[mono(5, 44100), deep], &config()).unwrap();

        assert_eq!(kit.buffer.bit_depth, 16);
        let start = 44 + 5 + 44;
        assert_eq!(&kit.buffer.samples[start..start + 5], &[1000; 5]);
    }
}
