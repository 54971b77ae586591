//! WAV container writer with cue-point support.
//!
//! Builds the complete byte image in memory - RIFF header, `fmt ` chunk,
//! `data` chunk and trailing `cue ` chunk, with the declared sizes covering
//! all of them - then writes it out in one operation. Appending to an
//! already-finalized file is exactly the kind of trick players punish by
//! ignoring the cue points.

mod cue;
mod format;
mod writer;


pub use cue::{cue_wav_image, encode_cue_chunk, find_cue_points, write_wav_with_cues};
pub use format::WavFormat;
pub use writer::{pcm_bytes, write_wav, write_wav_to_vec};
