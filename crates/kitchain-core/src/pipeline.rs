//! End-to-end kit building.
//!
//! Strict sequential load -> trim -> assemble -> encode, aborting at the
//! first error with the stage and offending file attached. Both output
//! files are written atomically, so a failed build never leaves a partial
//! export on disk.

use std::path::{Path, PathBuf};

use crate::assemble::{Assembler, SliceMarker};
use crate::buffer::channel_description;
use crate::config::{KitConfig, OtSettings};
use crate::error::{KitError, KitResult, ProcessingError};
use crate::loader::load;
use crate::ot::encode_slice_metadata;
use crate::persist::atomic_write;
use crate::trim::trim;
use crate::wav::cue_wav_image;

/// Extension of the slice-metadata sidecar.
pub const SIDECAR_EXTENSION: &str = "ot";

/// Summary of a successful build.
#[derive(Debug, Clone)]
pub struct KitReport {
    /// Path of the cue-annotated WAV.
    pub output_wav: PathBuf,
    /// Path of the sidecar, when one was written.
    pub sidecar: Option<PathBuf>,
    /// Number of input files chained.
    pub files: usize,
    /// Output channel count.
    pub channels: u16,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Total frames in the assembled kit.
    pub total_frames: u64,
    /// One marker per input, in order.
    pub markers: Vec<SliceMarker>,
}

impl KitReport {
    /// Human-readable channel layout ("mono", "stereo", "6 channels").
    pub fn channel_description(&self) -> String {
        channel_description(self.channels)
    }
}

/// Returns the sidecar path for an output WAV: same base name, `.ot`
/// extension, same directory.
pub fn sidecar_path(output_wav: &Path) -> PathBuf {
    output_wav.with_extension(SIDECAR_EXTENSION)
}

/// Builds a kit from an ordered list of WAV files.
///
/// Each input is loaded, trimmed and appended in order; `progress` is
/// invoked with `(files_processed, total_files)` after each file is fully
/// assembled. The callback is advisory only - it receives no errors and
/// its return is ignored. Pass `None` for `sidecar` to skip the
/// slice-metadata file.
///
/// The whole batch fails on the first bad file: a kit with a missing slice
/// is worse than no kit.
pub fn build_kit(
    inputs: &[PathBuf],
    output_wav: &Path,
    config: &KitConfig,
    sidecar: Option<&OtSettings>,
    mut progress: impl FnMut(usize, usize),
) -> KitResult<KitReport> {
    if inputs.is_empty() {
        return Err(KitError::NoInputs);
    }

    let total = inputs.len();
    let mut assembler = Assembler::new(config);

    for (index, path) in inputs.iter().enumerate() {
        let buffer = load(path).map_err(|source| KitError::Load {
            path: path.clone(),
            source,
        })?;

        let outcome = trim(&buffer, config);
        if outcome.degenerate {
            return Err(KitError::Process {
                path: path.clone(),
                source: ProcessingError::DegenerateSilence {
                    source_index: index,
                },
            });
        }

        assembler
            .push(&outcome.buffer)
            .map_err(|source| KitError::Process {
                path: path.clone(),
                source,
            })?;

        progress(index + 1, total);
    }

    let kit = match assembler.finish() {
        Some(kit) => kit,
        None => return Err(KitError::NoInputs),
    };
    let total_frames = kit.buffer.frame_count() as u64;

    // Encode both outputs before writing either, so an encoding failure
    // leaves no output at all rather than half a pair.
    let wav_image = cue_wav_image(&kit.buffer, &kit.markers).map_err(KitError::Encode)?;
    let record = match sidecar {
        Some(settings) => Some(encode_slice_metadata(&kit.markers, total_frames, settings)?),
        None => None,
    };

    atomic_write(output_wav, &wav_image).map_err(|err| KitError::Encode(err.into()))?;
    let sidecar_out = match record {
        Some(record) => {
            let path = sidecar_path(output_wav);
            atomic_write(&path, &record).map_err(|err| KitError::Encode(err.into()))?;
            Some(path)
        }
        None => None,
    };

    Ok(KitReport {
        output_wav: output_wav.to_path_buf(),
        sidecar: sidecar_out,
        files: total,
        channels: kit.buffer.channels,
        sample_rate: kit.buffer.sample_rate,
        total_frames,
        markers: kit.markers,
    })
}
