//! Core WAV writing and PCM serialization.

use std::io::{self, Write};

use crate::buffer::AudioBuffer;

use super::format::WavFormat;

/// Writes a complete WAV file to a writer.
///
/// `trailing` holds pre-encoded chunks (such as a `cue ` chunk) appended
/// after the `data` chunk; the declared RIFF size covers them, so readers
/// that trust the header still see every chunk. An image too large for the
/// 32-bit size field fails with `InvalidInput`.
///
/// # Arguments
/// * `writer` - Output writer
/// * `format` - WAV format parameters
/// * `pcm_data` - Raw PCM samples as bytes
/// * `trailing` - Extra chunks appended after the data chunk
pub fn write_wav<W: Write>(
    writer: &mut W,
    format: &WavFormat,
    pcm_data: &[u8],
    trailing: &[u8],
) -> io::Result<()> {
    let file_size = riff_size(pcm_data.len(), trailing.len()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "WAV image exceeds the 4 GiB RIFF size limit",
        )
    })?;
    let data_size = pcm_data.len() as u32;
    let pad = data_size % 2;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // Chunk size (16 for PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Audio format (1 = PCM)
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;
    if pad == 1 {
        writer.write_all(&[0])?;
    }

    writer.write_all(trailing)?;

    Ok(())
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(
    format: &WavFormat,
    pcm_data: &[u8],
    trailing: &[u8],
) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(44 + pcm_data.len() + trailing.len());
    write_wav(&mut buffer, format, pcm_data, trailing)?;
    Ok(buffer)
}

/// Declared RIFF size for the assembled image, including the pad byte for
/// an odd data chunk. The size field is 32 bits, so images past 4 GiB of
/// bytes are refused rather than silently wrapped, even when every frame
/// position still fits.
pub(super) fn riff_size(data_len: usize, trailing_len: usize) -> Option<u32> {
    let data = data_len as u64;
    let pad = data % 2;
    let total = 4 + (8 + 16) + (8 + data + pad) + trailing_len as u64;
    u32::try_from(total).ok()
}

/// Serializes a buffer's samples to PCM bytes at its bit depth.
///
/// 8-bit output is unsigned per the WAV convention; 16/24/32-bit output is
/// signed little-endian. Out-of-range values are clipped.
pub fn pcm_bytes(buffer: &AudioBuffer) -> Vec<u8> {
    let bytes_per_sample = (buffer.bit_depth / 8) as usize;
    let mut pcm = Vec::with_capacity(buffer.samples.len() * bytes_per_sample);

    match buffer.bit_depth {
        8 => {
            for &s in &buffer.samples {
                pcm.push((s.clamp(-128, 127) + 128) as u8);
            }
        }
        16 => {
            for &s in &buffer.samples {
                let v = s.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
                pcm.extend_from_slice(&v.to_le_bytes());
            }
        }
        24 => {
            for &s in &buffer.samples {
                let v = s.clamp(-(1 << 23), (1 << 23) - 1);
                pcm.extend_from_slice(&v.to_le_bytes()[..3]);
            }
        }
        _ => {
            for &s in &buffer.samples {
                pcm.extend_from_slice(&s.to_le_bytes());
            }
        }
    }

    pcm
}
