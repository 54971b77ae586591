//! `cue ` chunk encoding for hardware slice import.

use std::path::Path;

use crate::assemble::SliceMarker;
use crate::buffer::AudioBuffer;
use crate::error::EncodingError;
use crate::persist::atomic_write;

use super::format::WavFormat;
use super::writer::{pcm_bytes, write_wav_to_vec};

/// Bytes per cue point record.
const CUE_POINT_SIZE: u32 = 24;

/// Encodes slice markers as a complete `cue ` chunk.
///
/// Layout (little-endian): 4-byte tag, 4-byte size (`4 + 24*N`), 4-byte
/// count, then per marker: id (1-based), position, `data`, chunk start 0,
/// block start 0, sample offset equal to the position. Positions are frame
/// offsets; anything that does not fit in 32 bits is an error rather than a
/// silent truncation.
pub fn encode_cue_chunk(markers: &[SliceMarker]) -> Result<Vec<u8>, EncodingError> {
    let count = markers.len() as u32;
    let body_size = 4 + CUE_POINT_SIZE * count;
    let mut chunk = Vec::with_capacity(8 + body_size as usize);

    chunk.extend_from_slice(b"cue ");
    chunk.extend_from_slice(&body_size.to_le_bytes());
    chunk.extend_from_slice(&count.to_le_bytes());

    for (i, marker) in markers.iter().enumerate() {
        let position: u32 = marker
            .frame_position
            .try_into()
            .map_err(|_| EncodingError::PositionOverflow {
                position: marker.frame_position,
            })?;
        chunk.extend_from_slice(&(i as u32 + 1).to_le_bytes());
        chunk.extend_from_slice(&position.to_le_bytes());
        chunk.extend_from_slice(b"data");
        chunk.extend_from_slice(&0u32.to_le_bytes());
        chunk.extend_from_slice(&0u32.to_le_bytes());
        chunk.extend_from_slice(&position.to_le_bytes());
    }

    Ok(chunk)
}

/// Extracts cue-point frame positions from a WAV file image.
///
/// Walks the chunk list the same way players do, so it sees the cue chunk
/// only if the declared RIFF size actually covers it. Returns `None` when
/// the image is not a WAV file or carries no cue chunk.
pub fn find_cue_points(wav_data: &[u8]) -> Option<Vec<u64>> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }
    let declared = u32::from_le_bytes(wav_data[4..8].try_into().ok()?) as usize + 8;
    let end = declared.min(wav_data.len());

    let mut pos = 12;
    while pos + 8 <= end {
        let chunk_id = &wav_data[pos..pos + 4];
        let chunk_size =
            u32::from_le_bytes(wav_data[pos + 4..pos + 8].try_into().ok()?) as usize;

        if chunk_id == b"cue " {
            return parse_cue_body(&wav_data[pos + 8..(pos + 8 + chunk_size).min(end)]);
        }

        pos += 8 + chunk_size;
        // Align to word boundary
        if chunk_size % 2 == 1 {
            pos += 1;
        }
    }

    None
}

fn parse_cue_body(body: &[u8]) -> Option<Vec<u64>> {
    if body.len() < 4 {
        return None;
    }
    let count = u32::from_le_bytes(body[0..4].try_into().ok()?) as usize;
    if body.len() < 4 + count * CUE_POINT_SIZE as usize {
        return None;
    }

    let mut positions = Vec::with_capacity(count);
    for i in 0..count {
        let record = &body[4 + i * CUE_POINT_SIZE as usize..];
        let position = u32::from_le_bytes(record[4..8].try_into().ok()?);
        positions.push(position as u64);
    }
    Some(positions)
}

/// Builds the complete cue-annotated WAV image for a kit.
pub fn cue_wav_image(
    buffer: &AudioBuffer,
    markers: &[SliceMarker],
) -> Result<Vec<u8>, EncodingError> {
    let cue_chunk = encode_cue_chunk(markers)?;
    let format = WavFormat::for_buffer(buffer);
    Ok(write_wav_to_vec(&format, &pcm_bytes(buffer), &cue_chunk)?)
}

/// Writes the kit as a WAV file with a trailing `cue ` chunk.
///
/// The image is assembled in memory first and written atomically (temp file
/// plus rename), so a failure never leaves a partial file visible.
pub fn write_wav_with_cues(
    buffer: &AudioBuffer,
    markers: &[SliceMarker],
    path: &Path,
) -> Result<(), EncodingError> {
    let image = cue_wav_image(buffer, markers)?;
    atomic_write(path, &image)?;
    Ok(())
}
