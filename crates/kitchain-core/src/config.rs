//! Processing configuration.

/// Immutable configuration for a single kit build.
///
/// These five fields are the entire tunable surface of the core pipeline.
/// Constructed once per build request and passed by reference throughout.
#[derive(Debug, Clone, PartialEq)]
pub struct KitConfig {
    /// Duration of the silent marker inserted before each sample, in ms.
    pub marker_duration_ms: u32,
    /// Silence detection threshold in dBFS (inclusive: a frame exactly at
    /// the threshold counts as silent).
    pub silence_threshold_dbfs: f64,
    /// Minimum duration of a low-amplitude run to qualify as silence, in ms.
    pub min_silence_len_ms: u32,
    /// Amount of silence retained when a silence run is shortened, in ms.
    pub retained_silence_ms: u32,
    /// Output channel count. `None` preserves the first file's layout;
    /// all subsequent files are normalized to it.
    pub target_channels: Option<u16>,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            marker_duration_ms: 1,
            silence_threshold_dbfs: -50.0,
            min_silence_len_ms: 10,
            retained_silence_ms: 1,
            target_channels: None,
        }
    }
}

/// Settings for the Octatrack slice-metadata sidecar.
///
/// Defaults match the original hardware conventions: 120 BPM, unity gain,
/// loop and stretch off.
#[derive(Debug, Clone, PartialEq)]
pub struct OtSettings {
    /// Tempo in beats per minute.
    pub tempo_bpm: f64,
    /// Gain offset in dB, clamped to the hardware's -24..=24 range and
    /// stored with a +48 bias in the sidecar.
    pub gain_db: i16,
    /// Loop mode: 0 = off, 1 = on, 2 = ping-pong.
    pub loop_mode: u32,
    /// Time stretch mode: 0 = off, 1 = normal, 2 = beat.
    pub stretch_mode: u32,
    /// Trigger quantization setting.
    pub quantize: u8,
}

impl Default for OtSettings {
    fn default() -> Self {
        Self {
            tempo_bpm: 120.0,
            gain_db: 0,
            loop_mode: 0,
            stretch_mode: 0,
            quantize: 0,
        }
    }
}
