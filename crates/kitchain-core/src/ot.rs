//! Octatrack slice-metadata sidecar (.ot) encoding.
//!
//! The sidecar is a fixed 832-byte big-endian record: a 16-byte magic
//! header, tempo/trim/loop/gain settings, a 64-slot slice table and a
//! trailing 16-bit checksum. Unused slice slots are zero-filled, never
//! omitted; the record is always exactly [`SIDECAR_SIZE`] bytes.

use crate::assemble::SliceMarker;
use crate::config::OtSettings;
use crate::error::EncodingError;

/// Total sidecar size in bytes.
pub const SIDECAR_SIZE: usize = 832;
/// Hardware slice-slot limit.
pub const MAX_SLICES: usize = 64;
/// Tempo is stored as BPM times this multiplier, pinned from the reference
/// writer and its unit tests.
pub const TEMPO_MULTIPLIER: f64 = 6.0;

/// 16-byte file header: "FORM" magic plus the "DPS1SMPA" file type.
const HEADER_MAGIC: [u8; 16] = *b"FORM\x00\x00\x03,DPS1SMPA";

const OFFSET_TEMPO: usize = 0x10;
const OFFSET_TRIM_LEN: usize = 0x14;
const OFFSET_LOOP_LEN: usize = 0x18;
const OFFSET_STRETCH: usize = 0x1C;
const OFFSET_LOOP_MODE: usize = 0x20;
const OFFSET_GAIN: usize = 0x24;
const OFFSET_QUANTIZE: usize = 0x26;
const OFFSET_TRIM_START: usize = 0x28;
const OFFSET_TRIM_END: usize = 0x2C;
const OFFSET_LOOP_POINT: usize = 0x30;
const OFFSET_SLICE_COUNT: usize = 0x34;
const OFFSET_SLICE_TABLE: usize = 0x38;
const OFFSET_CHECKSUM: usize = 0x33E;

/// Gain is stored with a +48 bias so 0 dB encodes as 48.
const GAIN_BIAS: i16 = 48;
/// Hardware gain range in dB; out-of-range settings are clamped.
const GAIN_MIN_DB: i16 = -24;
const GAIN_MAX_DB: i16 = 24;

/// One decoded slice-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceEntry {
    /// Frame where the slice starts.
    pub start: u32,
    /// Frame where the slice ends (the next slice's start, or the end of
    /// the kit for the last slice).
    pub end: u32,
    /// Loop point, set to the slice start.
    pub loop_point: u32,
}

/// Decoded summary of a sidecar, as read back by `inspect`.
#[derive(Debug, Clone, PartialEq)]
pub struct SidecarSummary {
    /// Tempo in BPM.
    pub tempo_bpm: f64,
    /// Trim length in frames.
    pub trim_len: u32,
    /// Loop length in frames.
    pub loop_len: u32,
    /// The populated slice entries.
    pub slices: Vec<SliceEntry>,
}

/// Encodes slice markers into the fixed 832-byte sidecar record.
///
/// Each marker becomes a slice running from its frame position to the next
/// marker's (the last slice runs to `total_frames`), looping from its own
/// start. Trim and loop lengths cover the whole kit.
///
/// # Arguments
/// * `markers` - Slice markers from the assembler, at most [`MAX_SLICES`]
/// * `total_frames` - Frame count of the assembled kit
/// * `settings` - Tempo, gain and playback mode settings
///
/// # Returns
/// The complete record, or [`EncodingError::TooManySlices`] /
/// [`EncodingError::PositionOverflow`] - the hardware has a fixed slot
/// limit and 32-bit position fields, and truncating either would corrupt
/// the kit silently.
pub fn encode_slice_metadata(
    markers: &[SliceMarker],
    total_frames: u64,
    settings: &OtSettings,
) -> Result<[u8; SIDECAR_SIZE], EncodingError> {
    if markers.len() > MAX_SLICES {
        return Err(EncodingError::TooManySlices {
            count: markers.len(),
        });
    }
    let total: u32 = total_frames
        .try_into()
        .map_err(|_| EncodingError::PositionOverflow {
            position: total_frames,
        })?;

    let mut data = [0u8; SIDECAR_SIZE];
    data[..HEADER_MAGIC.len()].copy_from_slice(&HEADER_MAGIC);

    let tempo = (settings.tempo_bpm * TEMPO_MULTIPLIER).round() as u32;
    write_u32_be(&mut data, OFFSET_TEMPO, tempo);
    write_u32_be(&mut data, OFFSET_TRIM_LEN, total);
    write_u32_be(&mut data, OFFSET_LOOP_LEN, total);
    write_u32_be(&mut data, OFFSET_STRETCH, settings.stretch_mode);
    write_u32_be(&mut data, OFFSET_LOOP_MODE, settings.loop_mode);
    let gain = settings.gain_db.clamp(GAIN_MIN_DB, GAIN_MAX_DB) + GAIN_BIAS;
    write_u16_be(&mut data, OFFSET_GAIN, gain as u16);
    data[OFFSET_QUANTIZE] = settings.quantize;
    write_u32_be(&mut data, OFFSET_TRIM_START, 0);
    write_u32_be(&mut data, OFFSET_TRIM_END, total);
    write_u32_be(&mut data, OFFSET_LOOP_POINT, 0);
    write_u32_be(&mut data, OFFSET_SLICE_COUNT, markers.len() as u32);

    for (i, marker) in markers.iter().enumerate() {
        let start: u32 = marker
            .frame_position
            .try_into()
            .map_err(|_| EncodingError::PositionOverflow {
                position: marker.frame_position,
            })?;
        let end = match markers.get(i + 1) {
            Some(next) => next.frame_position.try_into().map_err(|_| {
                EncodingError::PositionOverflow {
                    position: next.frame_position,
                }
            })?,
            None => total,
        };
        let offset = OFFSET_SLICE_TABLE + i * 12;
        write_u32_be(&mut data, offset, start);
        write_u32_be(&mut data, offset + 4, end);
        write_u32_be(&mut data, offset + 8, start);
    }

    let sum = checksum(&data);
    write_u16_be(&mut data, OFFSET_CHECKSUM, sum);
    Ok(data)
}

/// Validates a sidecar's size, magic header and checksum.
pub fn verify_slice_metadata(data: &[u8]) -> Result<(), EncodingError> {
    if data.len() != SIDECAR_SIZE {
        return Err(EncodingError::InvalidSidecar {
            reason: format!("expected {} bytes, found {}", SIDECAR_SIZE, data.len()),
        });
    }
    if data[..HEADER_MAGIC.len()] != HEADER_MAGIC {
        return Err(EncodingError::InvalidSidecar {
            reason: "bad header magic".to_string(),
        });
    }
    let stored = u16::from_be_bytes([data[OFFSET_CHECKSUM], data[OFFSET_CHECKSUM + 1]]);
    let computed = checksum(data);
    if stored != computed {
        return Err(EncodingError::InvalidSidecar {
            reason: format!("checksum mismatch: stored {:#06x}, computed {:#06x}", stored, computed),
        });
    }
    Ok(())
}

/// Decodes a verified sidecar into a summary.
pub fn read_summary(data: &[u8]) -> Result<SidecarSummary, EncodingError> {
    verify_slice_metadata(data)?;

    let slice_count = read_u32_be(data, OFFSET_SLICE_COUNT) as usize;
    if slice_count > MAX_SLICES {
        return Err(EncodingError::InvalidSidecar {
            reason: format!("slice count {} exceeds the {}-slot table", slice_count, MAX_SLICES),
        });
    }

    let slices = (0..slice_count)
        .map(|i| {
            let offset = OFFSET_SLICE_TABLE + i * 12;
            SliceEntry {
                start: read_u32_be(data, offset),
                end: read_u32_be(data, offset + 4),
                loop_point: read_u32_be(data, offset + 8),
            }
        })
        .collect();

    Ok(SidecarSummary {
        tempo_bpm: read_u32_be(data, OFFSET_TEMPO) as f64 / TEMPO_MULTIPLIER,
        trim_len: read_u32_be(data, OFFSET_TRIM_LEN),
        loop_len: read_u32_be(data, OFFSET_LOOP_LEN),
        slices,
    })
}

/// 16-bit running sum over the record body (everything after the header,
/// up to the checksum field).
fn checksum(data: &[u8]) -> u16 {
    data[HEADER_MAGIC.len()..OFFSET_CHECKSUM]
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(b as u16))
}

fn write_u32_be(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn write_u16_be(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

fn read_u32_be(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}
