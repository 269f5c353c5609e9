/// Integration tests for the patch renderer CLI.
///
/// These render short clips through the real binary and verify:
/// 1. WAV files come out with the advertised format
/// 2. Velocity affects amplitude
/// 3. Rendering is deterministic
use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "patch-renderer", "--"]);
    cmd
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(name)
}

#[test]
fn test_cli_renders_wav() {
    let output_path = temp_path("patch_test_cli.wav");
    let _ = std::fs::remove_file(&output_path);

    let status = cargo_bin()
        .args(["-n", "60", "-v", "100", "-d", "0.5", "-g", "0.25", "-o"])
        .arg(&output_path)
        .status()
        .expect("failed to run patch-renderer");

    assert!(status.success(), "patch-renderer exited with error");
    assert!(output_path.exists(), "WAV file not created");

    let reader = hound::WavReader::open(&output_path).expect("invalid WAV file");
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, 44100);
    assert_eq!(reader.spec().bits_per_sample, 24);
    assert_eq!(reader.len(), 22050);

    std::fs::remove_file(&output_path).ok();
}

#[test]
fn test_cli_velocity_affects_level() {
    let quiet = temp_path("patch_vel_030.wav");
    let loud = temp_path("patch_vel_127.wav");

    for (vel, path) in [("30", &quiet), ("127", &loud)] {
        let _ = std::fs::remove_file(path);
        let status = cargo_bin()
            .args(["-n", "60", "-v", vel, "-d", "0.3", "-o"])
            .arg(path)
            .status()
            .unwrap();
        assert!(status.success());
    }

    let peak_quiet = wav_peak(&quiet);
    let peak_loud = wav_peak(&loud);
    assert!(
        peak_loud > peak_quiet,
        "vel 127 peak ({peak_loud}) should exceed vel 30 ({peak_quiet})"
    );

    std::fs::remove_file(&quiet).ok();
    std::fs::remove_file(&loud).ok();
}

#[test]
fn test_cli_program_selection() {
    let drum = temp_path("patch_prog_drum.wav");
    let piano = temp_path("patch_prog_piano.wav");

    for (prog, path) in [("Log Drum", &drum), ("0", &piano)] {
        let _ = std::fs::remove_file(path);
        let status = cargo_bin()
            .args(["-p", prog, "-n", "60", "-d", "0.3", "-o"])
            .arg(path)
            .status()
            .unwrap();
        assert!(status.success());
    }

    assert_ne!(
        read_wav_samples(&drum),
        read_wav_samples(&piano),
        "different programs should sound different"
    );

    std::fs::remove_file(&drum).ok();
    std::fs::remove_file(&piano).ok();
}

#[test]
fn test_deterministic_output() {
    let path1 = temp_path("patch_det_1.wav");
    let path2 = temp_path("patch_det_2.wav");

    for path in [&path1, &path2] {
        let _ = std::fs::remove_file(path);
        let status = cargo_bin()
            .args(["-n", "60", "-v", "80", "-d", "0.3", "-o"])
            .arg(path)
            .status()
            .unwrap();
        assert!(status.success());
    }

    assert_eq!(
        read_wav_samples(&path1),
        read_wav_samples(&path2),
        "two renders of the same note should be identical"
    );

    std::fs::remove_file(&path1).ok();
    std::fs::remove_file(&path2).ok();
}

fn wav_peak(path: &std::path::Path) -> f64 {
    let mut reader = hound::WavReader::open(path).expect("failed to open WAV");
    let max_val = (1i32 << (reader.spec().bits_per_sample - 1)) as f64;
    reader
        .samples::<i32>()
        .map(|s| (s.unwrap() as f64 / max_val).abs())
        .fold(0.0f64, f64::max)
}

fn read_wav_samples(path: &std::path::Path) -> Vec<i32> {
    let mut reader = hound::WavReader::open(path).expect("failed to open WAV");
    reader.samples::<i32>().map(|s| s.unwrap()).collect()
}
