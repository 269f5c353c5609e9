/// Patch Renderer — openDX FM synthesis WAV renderer.
///
/// Standalone CLI tool for rendering factory programs to WAV files.
/// Drives the block engine the way a host would: note-on at sample zero,
/// sample-accurate note-off at the gate time, blocks of 512 frames.

use opendx_dsp::engine::FmEngine;
use opendx_dsp::events::{MidiMessage, TimedMessage};
use opendx_dsp::params::Params;
use opendx_dsp::presets;

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK: usize = 512;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut program: usize = presets::DEFAULT_PROGRAM;
    let mut notes: Vec<u8> = Vec::new();
    let mut velocities: Vec<u8> = Vec::new();
    let mut duration: f32 = 2.0;
    let mut gate: f32 = 1.0;
    let mut output_dir = String::from(".");
    let mut output_file: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--program" | "-p" => {
                i += 1;
                program = parse_program(&args[i]);
            }
            "--note" | "-n" => {
                i += 1;
                for s in args[i].split(',') {
                    notes.push(s.trim().parse().expect("invalid MIDI note"));
                }
            }
            "--velocity" | "-v" => {
                i += 1;
                for s in args[i].split(',') {
                    velocities.push(s.trim().parse().expect("invalid velocity"));
                }
            }
            "--duration" | "-d" => {
                i += 1;
                duration = args[i].parse().expect("invalid duration");
            }
            "--gate" | "-g" => {
                i += 1;
                gate = args[i].parse().expect("invalid gate time");
            }
            "--output" | "-o" => {
                i += 1;
                output_file = Some(args[i].clone());
            }
            "--output-dir" => {
                i += 1;
                output_dir = args[i].clone();
            }
            "--list" => {
                for (idx, p) in presets::PROGRAMS.iter().enumerate() {
                    println!("{idx:2}  {}", p.name);
                }
                return;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if notes.is_empty() {
        notes.push(60);
    }
    if velocities.is_empty() {
        velocities.push(100);
    }
    if gate > duration {
        gate = duration;
    }

    for &n in &notes {
        if n > 127 {
            eprintln!("MIDI note {n} out of range (0-127)");
            std::process::exit(1);
        }
    }

    let patch = presets::program(program).unwrap_or_else(|| {
        eprintln!("Program index {program} out of range (0-{})", presets::PROGRAMS.len() - 1);
        std::process::exit(1);
    });

    for &midi_note in &notes {
        for &vel in &velocities {
            let samples = render(patch, midi_note, vel, duration, gate);

            let path = match &output_file {
                Some(f) => f.clone(),
                None => {
                    let name = patch.name.replace(' ', "_").replace('.', "");
                    format!(
                        "{output_dir}/patch_{name}_{}_v{vel}.wav",
                        midi_note_name(midi_note)
                    )
                }
            };

            if let Err(e) = write_wav(&path, &samples) {
                eprintln!("Failed to write {path}: {e}");
                std::process::exit(1);
            }
            println!(
                "Wrote {path} ({} {}, note {midi_note}, vel {vel}, {duration}s)",
                patch.name,
                midi_note_name(midi_note)
            );
        }
    }
}

/// Render one note of the given program to a mono sample vector.
fn render(patch: &presets::Program, note: u8, velocity: u8, duration: f32, gate: f32) -> Vec<f32> {
    let mut engine = FmEngine::new(SAMPLE_RATE);
    engine.set_params(Params::from_program(patch));

    let total = (duration * SAMPLE_RATE) as usize;
    let gate_sample = (gate * SAMPLE_RATE) as usize;

    let mut left = vec![0.0f32; BLOCK];
    let mut right = vec![0.0f32; BLOCK];
    let mut out = Vec::with_capacity(total);

    let mut frame = 0;
    while frame < total {
        let len = BLOCK.min(total - frame);
        let mut messages: Vec<TimedMessage> = Vec::new();
        if frame == 0 {
            messages.push(TimedMessage::new(0, MidiMessage::NoteOn { note, velocity }));
        }
        if (frame..frame + len).contains(&gate_sample) {
            messages.push(TimedMessage::new(
                (gate_sample - frame) as u32,
                MidiMessage::NoteOff { note },
            ));
        }

        engine.process(&mut left[..len], &mut right[..len], &messages);
        out.extend_from_slice(&left[..len]);
        frame += len;
    }

    out
}

fn write_wav(path: &str, samples: &[f32]) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 24,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let scale = ((1i32 << 23) - 1) as f32;
    for &s in samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * scale) as i32)?;
    }
    writer.finalize()
}

/// Accept either a program index or a (case-insensitive) program name.
fn parse_program(arg: &str) -> usize {
    if let Ok(idx) = arg.parse::<usize>() {
        return idx;
    }
    match presets::program_by_name(arg) {
        Some((idx, _)) => idx,
        None => {
            eprintln!("Unknown program: {arg} (try --list)");
            std::process::exit(1);
        }
    }
}

fn midi_note_name(midi: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "Cs", "D", "Ds", "E", "F", "Fs", "G", "Gs", "A", "As", "B",
    ];
    let octave = (midi as i32 / 12) - 1;
    format!("{}{}", NAMES[midi as usize % 12], octave)
}

fn print_usage() {
    println!(
        "patch-renderer — render openDX factory programs to WAV

USAGE:
    patch-renderer [OPTIONS]

OPTIONS:
    -p, --program <IDX|NAME>   Factory program (default: 15 \"Log Drum\")
    -n, --note <N[,N...]>      MIDI note number(s) (default: 60)
    -v, --velocity <V[,V...]>  Note velocity 1-127 (default: 100)
    -d, --duration <SECS>      Total render length (default: 2.0)
    -g, --gate <SECS>          Note-off time (default: 1.0)
    -o, --output <FILE>        Output WAV path (single render)
        --output-dir <DIR>     Directory for auto-named files
        --list                 List factory programs and exit
    -h, --help                 Show this help"
    );
}
