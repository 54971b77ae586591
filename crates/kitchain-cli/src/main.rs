//! kitchain - chain WAV samples into hardware-sliceable kits.
//!
//! This binary provides commands for building concatenated sample kits with
//! cue-point markers and Octatrack slice-metadata sidecars, and for
//! inspecting kits that already exist.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

// Use modules from the library crate
use kitchain_cli::commands;
use kitchain_cli::commands::chain::ChainOptions;

/// kitchain - sample-chain kit builder
#[derive(Parser)]
#[command(name = "kitchain")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chain WAV files into a sliced kit with cue markers and an .ot sidecar
    Chain {
        /// Input WAV files, in kit order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,

        /// Silent marker duration between samples, in milliseconds
        #[arg(long, default_value_t = 1)]
        marker_ms: u32,

        /// Silence detection threshold in dBFS
        #[arg(long, default_value_t = -50.0, allow_negative_numbers = true)]
        silence_threshold: f64,

        /// Minimum silence duration to trim, in milliseconds
        #[arg(long, default_value_t = 10)]
        min_silence_ms: u32,

        /// Silence retained where a run is trimmed, in milliseconds
        #[arg(long, default_value_t = 1)]
        retained_silence_ms: u32,

        /// Force the output channel count (default: follow the first file)
        #[arg(long, conflicts_with = "mono")]
        channels: Option<u16>,

        /// Downmix the kit to mono
        #[arg(long)]
        mono: bool,

        /// Sidecar tempo in BPM
        #[arg(long, default_value_t = 120.0)]
        tempo: f64,

        /// Sidecar gain in dB
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        gain: i16,

        /// Skip writing the .ot sidecar
        #[arg(long)]
        no_sidecar: bool,
    },

    /// Show the cue points and slice table of an existing kit
    Inspect {
        /// Path to the kit WAV (the sidecar is looked up alongside it)
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chain {
            inputs,
            output,
            marker_ms,
            silence_threshold,
            min_silence_ms,
            retained_silence_ms,
            channels,
            mono,
            tempo,
            gain,
            no_sidecar,
        } => {
            let options = ChainOptions {
                inputs,
                output,
                marker_ms,
                silence_threshold,
                min_silence_ms,
                retained_silence_ms,
                channels: if mono { Some(1) } else { channels },
                tempo,
                gain,
                no_sidecar,
            };
            commands::chain::run(&options)
        }
        Commands::Inspect { input } => commands::inspect::run(&input),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
