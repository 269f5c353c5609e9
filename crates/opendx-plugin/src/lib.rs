// openDX — DX-style two-operator FM synthesizer plugin (CLAP + VST3).
//
// This crate is only the host boundary: parameter registration, event
// adaptation, and buffer plumbing. All synthesis lives in `opendx-dsp`.

use nih_plug::prelude::*;
use opendx_dsp::engine::FmEngine;
use opendx_dsp::events::{MidiMessage, TimedMessage};
use std::num::NonZeroU32;
use std::sync::Arc;

mod params;
use params::OpenDxParams;

/// Most offset-tagged messages we forward per block; the engine's own queue
/// is the authoritative cap for note events.
const MAX_BLOCK_MESSAGES: usize = 64;

struct OpenDx {
    params: Arc<OpenDxParams>,
    engine: FmEngine,
}

impl Default for OpenDx {
    fn default() -> Self {
        Self {
            params: Arc::new(OpenDxParams::default()),
            engine: FmEngine::new(44100.0),
        }
    }
}

/// Map a host note event to the engine's message model. Events the engine
/// has no use for (poly pressure, voice terminations, ...) map to `None`.
fn adapt_event<S>(event: &NoteEvent<S>) -> Option<TimedMessage> {
    match *event {
        NoteEvent::NoteOn { timing, note, velocity, .. } => Some(TimedMessage::new(
            timing,
            MidiMessage::NoteOn {
                note,
                velocity: (velocity * 127.0).round() as u8,
            },
        )),
        NoteEvent::NoteOff { timing, note, .. } => {
            Some(TimedMessage::new(timing, MidiMessage::NoteOff { note }))
        }
        NoteEvent::MidiCC { timing, cc, value, .. } => Some(TimedMessage::new(
            timing,
            MidiMessage::ControlChange {
                controller: cc,
                value: (value * 127.0).round() as u8,
            },
        )),
        NoteEvent::MidiPitchBend { timing, value, .. } => {
            // Host gives 0..1; the engine expects the raw 14-bit wire bytes.
            let raw = (value * 16383.0).round() as u16;
            Some(TimedMessage::new(
                timing,
                MidiMessage::PitchBend {
                    lsb: (raw & 0x7f) as u8,
                    msb: (raw >> 7) as u8,
                },
            ))
        }
        _ => None,
    }
}

impl Plugin for OpenDx {
    const NAME: &'static str = "openDX";
    const VENDOR: &'static str = "openDX";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[AudioIOLayout {
        main_input_channels: None,
        main_output_channels: NonZeroU32::new(2),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    }];

    const MIDI_INPUT: MidiConfig = MidiConfig::MidiCCs;
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        self.engine.set_sample_rate(buffer_config.sample_rate);
        true
    }

    fn reset(&mut self) {
        self.engine.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        // Parameter hand-off: one snapshot per block, read from the host's
        // atomic parameter storage. The engine never sees a torn update.
        self.engine.set_params(self.params.snapshot());

        // Collect this block's events into a fixed scratch array. Program
        // changes are host-automation territory in a plugin context, so they
        // are not forwarded (the engine's own program handling serves raw
        // MIDI hosts).
        let mut scratch = [TimedMessage::new(0, MidiMessage::NoteOff { note: 0 }); MAX_BLOCK_MESSAGES];
        let mut count = 0;
        while let Some(event) = context.next_event() {
            if count == MAX_BLOCK_MESSAGES {
                break;
            }
            if let Some(message) = adapt_event(&event) {
                scratch[count] = message;
                count += 1;
            }
        }

        let (left, right) = buffer.as_slice().split_at_mut(1);
        self.engine.process(&mut left[0], &mut right[0], &scratch[..count]);

        ProcessStatus::Normal
    }
}

impl ClapPlugin for OpenDx {
    const CLAP_ID: &'static str = "org.opendx.fm-synth";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("DX-style two-operator FM synthesizer");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::Instrument,
        ClapFeature::Synthesizer,
        ClapFeature::Stereo,
    ];
}

impl Vst3Plugin for OpenDx {
    const VST3_CLASS_ID: [u8; 16] = *b"openDXfmSynthVST";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Instrument, Vst3SubCategory::Synth];
}

nih_export_clap!(OpenDx);
nih_export_vst3!(OpenDx);
