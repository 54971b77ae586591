//! kitchain core
//!
//! Turns an ordered collection of WAV files into a single concatenated kit
//! annotated with hardware-readable slice markers, for two sampler targets:
//! a `cue `-chunk WAV and a fixed-layout Octatrack `.ot` sidecar.
//!
//! # Pipeline
//!
//! Load -> trim -> assemble -> encode, strictly sequential and
//! single-threaded. Each stage owns its buffers; callers wanting a
//! responsive UI run [`build_kit`] on a background worker and receive
//! progress through its callback.
//!
//! - [`loader`] - WAV files into in-memory PCM buffers
//! - [`trim`] - silence detection and removal
//! - [`assemble`] - concatenation with frame-accurate slice markers
//! - [`wav`] - WAV container writer with `cue ` chunk support
//! - [`ot`] - 832-byte Octatrack slice-metadata sidecar
//! - [`pipeline`] - the end-to-end [`build_kit`] entry point
//!
//! # Frames, not samples
//!
//! All positions on this API are frame offsets: one sample per channel at a
//! time index. Interleaved sample counts are divided by the channel count
//! at every position-recording site, so stereo kits slice exactly where
//! mono kits do.
//!
//! # Example
//!
//! ```ignore
//! use kitchain_core::{build_kit, KitConfig, OtSettings};
//!
//! let config = KitConfig::default();
//! let settings = OtSettings::default();
//! let report = build_kit(&inputs, &output, &config, Some(&settings), |done, total| {
//!     println!("{}/{}", done, total);
//! })?;
//! println!("{} slices at {:?}", report.files, report.markers);
//! ```

pub mod assemble;
pub mod buffer;
pub mod config;
pub mod error;
pub mod loader;
pub mod ot;
pub mod pipeline;
pub mod trim;
pub mod wav;

mod persist;

// Re-export main types at crate root
pub use assemble::{assemble, Assembler, KitAssembly, SliceMarker};
pub use buffer::AudioBuffer;
pub use config::{KitConfig, OtSettings};
pub use error::{EncodingError, KitError, KitResult, LoadError, ProcessingError};
pub use loader::load;
pub use pipeline::{build_kit, sidecar_path, KitReport};
pub use trim::{trim, TrimOutcome};
