//! Error types for the kit-build pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for whole-pipeline operations.
pub type KitResult<T> = Result<T, KitError>;

/// Errors raised while loading a WAV file into an [`AudioBuffer`].
///
/// [`AudioBuffer`]: crate::AudioBuffer
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is not a PCM WAV container this pipeline can ingest.
    #[error("invalid WAV file: {reason}")]
    InvalidFormat {
        /// Why the header was rejected.
        reason: String,
    },

    /// The file contains no audio frames.
    #[error("file contains no audio")]
    EmptyFile,

    /// Bit depth outside {8, 16, 24, 32}.
    #[error("unsupported bit depth: {bits} bits per sample")]
    UnsupportedBitDepth {
        /// The offending bit depth.
        bits: u16,
    },

    /// Sample rate outside the supported 8 kHz - 192 kHz range.
    #[error("unsupported sample rate: {rate} Hz")]
    UnsupportedSampleRate {
        /// The offending sample rate.
        rate: u32,
    },

    /// Channel count outside the supported 1-8 range.
    #[error("unsupported channel count: {channels}")]
    UnsupportedChannelCount {
        /// The offending channel count.
        channels: u16,
    },

    /// I/O failure while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while trimming or assembling buffers.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// A buffer reported zero channels.
    #[error("input {source_index} has no channels")]
    ChannelMismatch {
        /// Zero-based index of the offending input.
        source_index: usize,
    },

    /// A buffer's sample rate differs from the kit's rate. The core does no
    /// resampling, so mixed rates are rejected rather than pitch-shifted.
    #[error("input {source_index} has sample rate {found} Hz, kit is {expected} Hz")]
    SampleRateMismatch {
        /// Zero-based index of the offending input.
        source_index: usize,
        /// The kit's sample rate, fixed by the first input.
        expected: u32,
        /// The offending input's sample rate.
        found: u32,
    },

    /// An input was entirely below the silence threshold.
    #[error("input {source_index} is entirely silence")]
    DegenerateSilence {
        /// Zero-based index of the offending input.
        source_index: usize,
    },

    /// Assembly was attempted with no input buffers.
    #[error("no input buffers to assemble")]
    EmptyKit,
}

/// Errors raised while encoding output files.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A frame position does not fit in the 32-bit fields the formats use.
    #[error("frame position {position} does not fit in 32 bits")]
    PositionOverflow {
        /// The overflowing frame position.
        position: u64,
    },

    /// More inputs than the hardware's 64 slice slots.
    #[error("{count} slices exceed the 64-slot limit")]
    TooManySlices {
        /// Number of slices requested.
        count: usize,
    },

    /// A sidecar file failed structural or checksum validation.
    #[error("invalid slice-metadata sidecar: {reason}")]
    InvalidSidecar {
        /// Why validation failed.
        reason: String,
    },

    /// I/O failure while writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level pipeline error, carrying the stage and offending file.
#[derive(Debug, Error)]
pub enum KitError {
    /// No input files were supplied.
    #[error("no input files")]
    NoInputs,

    /// A file failed to load.
    #[error("failed to load {}: {source}", path.display())]
    Load {
        /// The offending input file.
        path: PathBuf,
        /// Underlying load error.
        #[source]
        source: LoadError,
    },

    /// A file failed during trimming or assembly.
    #[error("failed to process {}: {source}", path.display())]
    Process {
        /// The offending input file.
        path: PathBuf,
        /// Underlying processing error.
        #[source]
        source: ProcessingError,
    },

    /// Output encoding failed.
    #[error("failed to encode output: {0}")]
    Encode(#[from] EncodingError),
}
