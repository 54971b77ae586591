//! End-to-end pipeline tests: real files in, real files out.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use kitchain_core::ot::{read_summary, verify_slice_metadata, SIDECAR_SIZE};
use kitchain_core::wav::find_cue_points;
use kitchain_core::{build_kit, KitConfig, KitError, OtSettings, ProcessingError};

fn write_wav(path: &Path, channels: u16, samples: &[i32]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Config used by most tests: no retained gap so frame math is exact.
fn config() -> KitConfig {
    KitConfig {
        retained_silence_ms: 0,
        ..KitConfig::default()
    }
}

#[test]
fn two_mono_files_slice_at_44_and_188() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.wav");
    let b = dir.path().join("b.wav");
    let out = dir.path().join("kit.wav");
    write_wav(&a, 1, &vec![1000; 100]);
    write_wav(&b, 1, &vec![1000; 200]);

    let report = build_kit(
        &[a, b],
        &out,
        &config(),
        Some(&OtSettings::default()),
        |_, _| {},
    )
    .unwrap();

    let positions: Vec<u64> = report.markers.iter().map(|m| m.frame_position).collect();
    assert_eq!(positions, vec![44, 188]);
    // marker + 100 + marker + 200 + marker
    assert_eq!(report.total_frames, 432);

    let wav = std::fs::read(&out).unwrap();
    assert_eq!(find_cue_points(&wav).unwrap(), vec![44, 188]);

    let sidecar = std::fs::read(report.sidecar.unwrap()).unwrap();
    assert_eq!(sidecar.len(), SIDECAR_SIZE);
    verify_slice_metadata(&sidecar).unwrap();
    let summary = read_summary(&sidecar).unwrap();
    assert_eq!(summary.slices.len(), 2);
    assert_eq!(summary.slices[0].start, 44);
    assert_eq!(summary.slices[0].end, 188);
    assert_eq!(summary.slices[1].start, 188);
    assert_eq!(summary.slices[1].end, 432);
    assert_eq!(summary.trim_len, 432);
}

#[test]
fn stereo_positions_use_frames_not_interleaved_samples() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("stereo.wav");
    let out = dir.path().join("kit.wav");
    // One second of stereo: 88200 interleaved samples, 44100 frames.
    write_wav(&input, 2, &vec![1000; 2 * 44100]);

    let report = build_kit(&[input], &out, &config(), None, |_, _| {}).unwrap();

    assert_eq!(report.channels, 2);
    assert_eq!(report.markers[0].frame_position, 44);
    assert_eq!(report.total_frames, 44 + 44100 + 44);

    let wav = std::fs::read(&out).unwrap();
    assert_eq!(find_cue_points(&wav).unwrap(), vec![44]);
}

#[test]
fn output_wav_reads_back_with_expected_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("kit.wav");
    write_wav(&input, 1, &vec![1000; 50]);

    build_kit(&[input], &out, &config(), None, |_, _| {}).unwrap();

    let reader = hound::WavReader::open(&out).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.duration(), 44 + 50 + 44);
}

#[test]
fn progress_fires_once_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut inputs = Vec::new();
    for i in 0..3 {
        let path = dir.path().join(format!("{}.wav", i));
        write_wav(&path, 1, &vec![1000; 10]);
        inputs.push(path);
    }
    let out = dir.path().join("kit.wav");

    let mut calls = Vec::new();
    build_kit(&inputs, &out, &config(), None, |done, total| {
        calls.push((done, total));
    })
    .unwrap();

    assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
}

#[test]
fn pipeline_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.wav");
    let b = dir.path().join("b.wav");
    write_wav(&a, 1, &vec![1000; 300]);
    write_wav(&b, 2, &vec![500; 400]);
    let inputs = vec![a, b];

    let first = dir.path().join("first.wav");
    let second = dir.path().join("second.wav");
    let settings = OtSettings::default();
    build_kit(&inputs, &first, &config(), Some(&settings), |_, _| {}).unwrap();
    build_kit(&inputs, &second, &config(), Some(&settings), |_, _| {}).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
    assert_eq!(
        std::fs::read(first.with_extension("ot")).unwrap(),
        std::fs::read(second.with_extension("ot")).unwrap()
    );
}

#[test]
fn sixty_five_inputs_fail_rather_than_truncate() {
    let dir = tempfile::tempdir().unwrap();
    let mut inputs = Vec::new();
    for i in 0..65 {
        let path = dir.path().join(format!("{}.wav", i));
        write_wav(&path, 1, &vec![1000; 10]);
        inputs.push(path);
    }
    let out = dir.path().join("kit.wav");

    let err = build_kit(
        &inputs,
        &out,
        &config(),
        Some(&OtSettings::default()),
        |_, _| {},
    )
    .unwrap_err();

    assert!(matches!(
        err,
        KitError::Encode(kitchain_core::EncodingError::TooManySlices { count: 65 })
    ));
    // Neither output may exist: no truncated sidecar, no orphan WAV.
    assert!(!out.exists());
    assert!(!out.with_extension("ot").exists());
}

#[test]
fn bad_file_aborts_the_whole_batch() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.wav");
    let bad = dir.path().join("bad.wav");
    write_wav(&good, 1, &vec![1000; 100]);
    std::fs::write(&bad, b"not audio").unwrap();
    let out = dir.path().join("kit.wav");

    let err = build_kit(
        &[good, bad.clone()],
        &out,
        &config(),
        None,
        |_, _| {},
    )
    .unwrap_err();

    match err {
        KitError::Load { path, .. } => assert_eq!(path, bad),
        other => panic!("expected Load error, got {}", other),
    }
    // No partial export left behind.
    assert!(!out.exists());
}

#[test]
fn all_silent_input_is_a_degenerate_error() {
    let dir = tempfile::tempdir().unwrap();
    let silent = dir.path().join("silent.wav");
    write_wav(&silent, 1, &vec![0; 44100]);
    let out = dir.path().join("kit.wav");

    let err = build_kit(
        &[silent.clone()],
        &out,
        &config(),
        None,
        |_, _| {},
    )
    .unwrap_err();

    match err {
        KitError::Process {
            path,
            source: ProcessingError::DegenerateSilence { source_index },
        } => {
            assert_eq!(path, silent);
            assert_eq!(source_index, 0);
        }
        other => panic!("expected DegenerateSilence, got {}", other),
    }
}

#[test]
fn silence_is_trimmed_before_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("padded.wav");
    let out = dir.path().join("kit.wav");
    // 1000 silent frames either side of 100 loud ones; with zero retention
    // the assembled kit holds just the loud section between markers.
    let mut samples = vec![0i32; 1000];
    samples.extend(std::iter::repeat(1000).take(100));
    samples.extend(std::iter::repeat(0).take(1000));
    write_wav(&input, 1, &samples);

    let report = build_kit(&[input], &out, &config(), None, |_, _| {}).unwrap();
    assert_eq!(report.total_frames, 44 + 100 + 44);
}

#[test]
fn mixed_rate_inputs_are_rejected_with_the_offending_path() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.wav");
    let b = dir.path().join("b.wav");
    write_wav(&a, 1, &vec![1000; 100]);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&b, spec).unwrap();
    for _ in 0..100 {
        writer.write_sample(1000i16).unwrap();
    }
    writer.finalize().unwrap();
    let out = dir.path().join("kit.wav");

    let err = build_kit(&[a, b.clone()], &out, &config(), None, |_, _| {}).unwrap_err();
    match err {
        KitError::Process {
            path,
            source: ProcessingError::SampleRateMismatch { expected, found, .. },
        } => {
            assert_eq!(path, b);
            assert_eq!(expected, 44100);
            assert_eq!(found, 48000);
        }
        other => panic!("expected SampleRateMismatch, got {}", other),
    }
}

#[test]
fn no_sidecar_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let out: PathBuf = dir.path().join("kit.wav");
    write_wav(&input, 1, &vec![1000; 50]);

    let report = build_kit(&[input], &out, &config(), None, |_, _| {}).unwrap();
    assert_eq!(report.sidecar, None);
    assert!(!out.with_extension("ot").exists());
}
