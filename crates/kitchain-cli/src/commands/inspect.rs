//! Inspect command implementation.
//!
//! Re-parses a kit the way the hardware would: walks the WAV chunk list for
//! cue points and verifies the sidecar's checksum before trusting its slice
//! table.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use kitchain_core::ot::{read_summary, SidecarSummary};
use kitchain_core::sidecar_path;
use kitchain_core::wav::find_cue_points;

/// Everything inspect can recover from a kit on disk.
#[derive(Debug)]
pub struct Inspection {
    /// Cue-point frame positions from the WAV, if a cue chunk exists.
    pub cue_points: Option<Vec<u64>>,
    /// Decoded sidecar, when one exists and verifies.
    pub sidecar: Option<SidecarSummary>,
    /// Verification failure for an existing sidecar, if any.
    pub sidecar_error: Option<String>,
    /// Path the sidecar was looked for at.
    pub sidecar_path: PathBuf,
}

/// Gathers cue and sidecar data for a kit WAV.
pub fn gather(input: &Path) -> Result<Inspection> {
    let wav_data = std::fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let cue_points = find_cue_points(&wav_data);

    let sidecar_file = sidecar_path(input);
    let (sidecar, sidecar_error) = if sidecar_file.exists() {
        let bytes = std::fs::read(&sidecar_file)
            .with_context(|| format!("failed to read {}", sidecar_file.display()))?;
        match read_summary(&bytes) {
            Ok(summary) => (Some(summary), None),
            Err(err) => (None, Some(err.to_string())),
        }
    } else {
        (None, None)
    };

    Ok(Inspection {
        cue_points,
        sidecar,
        sidecar_error,
        sidecar_path: sidecar_file,
    })
}

/// Runs the inspect command.
///
/// # Returns
/// Exit code: 0 when the kit parses cleanly, 1 when the WAV has no cue
/// chunk or the sidecar fails verification.
pub fn run(input: &Path) -> Result<ExitCode> {
    let inspection = gather(input)?;
    let mut healthy = true;

    match &inspection.cue_points {
        Some(points) => {
            println!("{} {}", "Cue points:".green().bold(), points.len());
            for (i, position) in points.iter().enumerate() {
                println!("  {:>2}  frame {}", i + 1, position);
            }
        }
        None => {
            println!("{}", "No cue chunk found.".red());
            healthy = false;
        }
    }

    if let Some(summary) = &inspection.sidecar {
        println!(
            "{} {} ({} BPM, trim {} frames)",
            "Sidecar:".green().bold(),
            inspection.sidecar_path.display(),
            summary.tempo_bpm,
            summary.trim_len
        );
        for (i, slice) in summary.slices.iter().enumerate() {
            println!("  {:>2}  {} .. {}", i + 1, slice.start, slice.end);
        }
    } else if let Some(error) = &inspection.sidecar_error {
        println!("{} {}", "Sidecar invalid:".red().bold(), error);
        healthy = false;
    } else {
        println!("No sidecar at {}", inspection.sidecar_path.display());
    }

    Ok(if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
