//! Chain command implementation.
//!
//! Validates the input list upfront, then hands it to the core pipeline and
//! renders progress and the final report.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use kitchain_core::{build_kit, KitConfig, OtSettings};

/// Options for the chain command, mirroring the CLI flags.
#[derive(Debug, Clone)]
pub struct ChainOptions {
    /// Input WAV files in kit order.
    pub inputs: Vec<PathBuf>,
    /// Output WAV path.
    pub output: PathBuf,
    /// Silent marker duration between samples, in ms.
    pub marker_ms: u32,
    /// Silence detection threshold in dBFS.
    pub silence_threshold: f64,
    /// Minimum silence run to trim, in ms.
    pub min_silence_ms: u32,
    /// Silence retained where a run is trimmed, in ms.
    pub retained_silence_ms: u32,
    /// Forced output channel count (`None` follows the first file).
    pub channels: Option<u16>,
    /// Sidecar tempo in BPM.
    pub tempo: f64,
    /// Sidecar gain in dB.
    pub gain: i16,
    /// Skip writing the .ot sidecar.
    pub no_sidecar: bool,
}

/// Runs the chain command.
///
/// # Returns
/// Exit code: 0 on success, 1 when validation or the build fails.
pub fn run(options: &ChainOptions) -> Result<ExitCode> {
    let invalid = validate_inputs(&options.inputs);
    if !invalid.is_empty() {
        eprintln!("{}", "Invalid input files:".red().bold());
        for (path, reason) in &invalid {
            eprintln!("  {}: {}", path.display(), reason);
        }
        return Ok(ExitCode::FAILURE);
    }

    let config = KitConfig {
        marker_duration_ms: options.marker_ms,
        silence_threshold_dbfs: options.silence_threshold,
        min_silence_len_ms: options.min_silence_ms,
        retained_silence_ms: options.retained_silence_ms,
        target_channels: options.channels,
    };
    let settings = OtSettings {
        tempo_bpm: options.tempo,
        gain_db: options.gain,
        ..OtSettings::default()
    };
    let sidecar = if options.no_sidecar {
        None
    } else {
        Some(&settings)
    };

    let report = match build_kit(
        &options.inputs,
        &options.output,
        &config,
        sidecar,
        |done, total| {
            println!("Processing file {} of {}...", done, total);
        },
    ) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{} {}", "Build failed:".red().bold(), err);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!();
    println!(
        "{} {}",
        "Kit written:".green().bold(),
        report.output_wav.display()
    );
    println!(
        "  {} files, {} cue points, {} @ {} Hz, {} frames",
        report.files,
        report.markers.len(),
        report.channel_description(),
        report.sample_rate,
        report.total_frames
    );
    if let Some(sidecar) = &report.sidecar {
        println!("  {} {}", "Sidecar:".green(), sidecar.display());
    }

    Ok(ExitCode::SUCCESS)
}

/// Checks each input the way the file picker would: WAV extension, exists,
/// readable, non-empty. The core re-validates headers regardless; this pass
/// exists to fail the batch with every offending file named at once.
fn validate_inputs(inputs: &[PathBuf]) -> Vec<(PathBuf, String)> {
    let mut invalid = Vec::new();
    for path in inputs {
        if let Some(reason) = validate_input(path) {
            invalid.push((path.clone(), reason));
        }
    }
    invalid
}

fn validate_input(path: &Path) -> Option<String> {
    let is_wav = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);
    if !is_wav {
        return Some("not a WAV file (wrong extension)".to_string());
    }
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return Some("file does not exist or is unreadable".to_string()),
    };
    if !metadata.is_file() {
        return Some("not a regular file".to_string());
    }
    if metadata.len() == 0 {
        return Some("file is empty".to_string());
    }
    None
}
