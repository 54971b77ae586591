//! Silence detection and trimming.
//!
//! Scans a buffer with a per-frame peak envelope and shortens any
//! low-amplitude run that lasts long enough to qualify as silence. Leading
//! and trailing silence is cut down to the retained amount; interior runs
//! are shortened to exactly the retained amount so a perceptible gap
//! survives between chunks of audio.

use crate::buffer::{ms_to_frames, AudioBuffer};
use crate::config::KitConfig;

/// Result of trimming one buffer.
#[derive(Debug, Clone)]
pub struct TrimOutcome {
    /// The trimmed buffer.
    pub buffer: AudioBuffer,
    /// True when the whole input was at or below the silence threshold.
    /// The returned buffer is then the shortest legal run of silence, and
    /// callers must treat the source as degenerate rather than a success.
    pub degenerate: bool,
}

/// Converts a dBFS threshold to a linear amplitude for the given full scale.
fn db_to_amplitude(dbfs: f64, full_scale: f64) -> f64 {
    full_scale * 10f64.powf(dbfs / 20.0)
}

/// A contiguous run of silent frames, `start..end`.
#[derive(Debug, Clone, Copy)]
struct SilenceRun {
    start: usize,
    end: usize,
}

impl SilenceRun {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Trims silence from a buffer according to the configured thresholds.
///
/// A frame is silent when its peak amplitude across channels is at or below
/// `silence_threshold_dbfs` (inclusive, relative to full scale for the
/// buffer's bit depth). Runs shorter than `min_silence_len_ms` are left
/// untouched.
pub fn trim(buffer: &AudioBuffer, config: &KitConfig) -> TrimOutcome {
    let channels = buffer.channels as usize;
    let frame_count = buffer.frame_count();
    let floor = db_to_amplitude(config.silence_threshold_dbfs, buffer.full_scale());
    let min_run = ms_to_frames(config.min_silence_len_ms, buffer.sample_rate).max(1);
    let retained = ms_to_frames(config.retained_silence_ms, buffer.sample_rate);

    let silent: Vec<bool> = (0..frame_count)
        .map(|f| {
            let frame = &buffer.samples[f * channels..(f + 1) * channels];
            frame
                .iter()
                .all(|&s| ((s as i64).abs() as f64) <= floor)
        })
        .collect();

    let runs = collect_runs(&silent, min_run);

    // Entirely silent: hand back the shortest legal buffer, never an empty one.
    if runs.len() == 1 && runs[0].start == 0 && runs[0].end == frame_count {
        let frames = retained.max(1);
        return TrimOutcome {
            buffer: AudioBuffer::silent(frames, buffer.sample_rate, buffer.channels, buffer.bit_depth),
            degenerate: true,
        };
    }

    let mut samples = Vec::with_capacity(buffer.samples.len());
    let mut cursor = 0;
    for run in &runs {
        samples.extend_from_slice(&buffer.samples[cursor * channels..run.start * channels]);
        let keep = run.len().min(retained);
        // Leading silence keeps its tail so the gap stays adjacent to the
        // audio; everywhere else the head of the run is kept.
        let (keep_start, keep_end) = if run.start == 0 {
            (run.end - keep, run.end)
        } else {
            (run.start, run.start + keep)
        };
        samples.extend_from_slice(&buffer.samples[keep_start * channels..keep_end * channels]);
        cursor = run.end;
    }
    samples.extend_from_slice(&buffer.samples[cursor * channels..]);

    TrimOutcome {
        buffer: AudioBuffer {
            samples,
            sample_rate: buffer.sample_rate,
            channels: buffer.channels,
            bit_depth: buffer.bit_depth,
        },
        degenerate: false,
    }
}

/// Collects runs of consecutive silent frames at least `min_run` long.
fn collect_runs(silent: &[bool], min_run: usize) -> Vec<SilenceRun> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &is_silent) in silent.iter().enumerate() {
        match (is_silent, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_run {
                    runs.push(SilenceRun { start: s, end: i });
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if silent.len() - s >= min_run {
            runs.push(SilenceRun {
                start: s,
                end: silent.len(),
            });
        }
    }
    runs
}
