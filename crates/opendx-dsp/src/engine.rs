/// FmEngine — voice pool, sample-accurate block scheduler, output shaping.
///
/// The engine owns every piece of synthesis state and is driven from a
/// single real-time thread: one `process` call renders one block and never
/// allocates, locks, or performs I/O. Parameter changes arrive as whole
/// snapshots between blocks ([`FmEngine::set_params`]); coefficients are
/// derived once at block entry and held for the block.
///
/// Scheduling: note events are queued with sample offsets, controllers are
/// applied up front, and the block is rendered as sub-runs between event
/// offsets, so note starts land on the exact sample the host asked for.

use crate::events::{EventQueue, MidiMessage, TimedMessage};
use crate::lfo::BlockLfo;
use crate::output::OutputStage;
use crate::params::{Coefficients, Params};
use crate::presets;
use crate::voice::Voice;
use crate::{NUM_VOICES, SILENCE};

pub struct FmEngine {
    params: Params,
    coeffs: Coefficients,
    sample_rate: f32,

    voices: [Voice; NUM_VOICES],
    /// Cached count of sounding voices, recomputed at block boundaries.
    /// Drives the silent-block fast path.
    active_voices: usize,

    queue: EventQueue,
    lfo: BlockLfo,
    /// Held LFO contribution (vibrato + mod wheel), updated at the LFO's
    /// decimated rate.
    modulation: f32,

    // Controller state, updated immediately when messages arrive.
    mod_wheel: f32,
    pitch_bend: f32,
    volume: f32,
    sustain: bool,

    /// Program index consumed from a MIDI program change, for the host to
    /// pick up after the block.
    program_change: Option<u8>,

    /// Optional visualization tap: mono post-mix samples, pushed after each
    /// block with non-blocking writes (overflow is dropped, never waited on).
    #[cfg(feature = "rtrb")]
    tap: Option<rtrb::Producer<f32>>,
}

impl FmEngine {
    pub fn new(sample_rate: f32) -> Self {
        let params = Params::default();
        let coeffs = Coefficients::derive(&params, sample_rate);
        Self {
            params,
            coeffs,
            sample_rate,
            voices: [Voice::new(); NUM_VOICES],
            active_voices: 0,
            queue: EventQueue::new(),
            lfo: BlockLfo::new(),
            modulation: 0.0,
            mod_wheel: 0.0,
            pitch_bend: 1.0,
            volume: 0.0035,
            sustain: false,
            program_change: None,
            #[cfg(feature = "rtrb")]
            tap: None,
        }
    }

    /// Change the sample rate and drop all voice state (rates baked into
    /// sounding voices would be wrong at the new rate).
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Return to the power-on state, keeping the current parameters.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.active_voices = 0;
        self.queue.clear();
        self.lfo.reset();
        self.modulation = 0.0;
        self.mod_wheel = 0.0;
        self.pitch_bend = 1.0;
        self.volume = 0.0035;
        self.sustain = false;
    }

    /// Install the parameter snapshot used from the next block on.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn active_voices(&self) -> usize {
        self.active_voices
    }

    /// Take the pending "program changed" notification, if a MIDI program
    /// change was processed since the last call.
    pub fn take_program_change(&mut self) -> Option<u8> {
        self.program_change.take()
    }

    /// Attach a lock-free consumer for the mono post-mix signal
    /// (visualization side channel).
    #[cfg(feature = "rtrb")]
    pub fn set_tap(&mut self, tap: rtrb::Producer<f32>) {
        self.tap = Some(tap);
    }

    /// Render one block. `left` and `right` must be the same length; the
    /// engine writes the same mono mix to both. `messages` carry sample
    /// offsets relative to this block, in nondecreasing order.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32], messages: &[TimedMessage]) {
        debug_assert_eq!(left.len(), right.len());
        let frames = left.len();

        // Snapshot-and-hold: one coefficient set for the whole block.
        self.coeffs = Coefficients::derive(&self.params, self.sample_rate);
        let output = OutputStage::new(self.coeffs.saturation, self.coeffs.output_gain);

        self.queue.clear();
        for message in messages {
            self.dispatch(message);
        }

        let has_in_block_event = self
            .queue
            .peek_offset()
            .is_some_and(|offset| (offset as usize) < frames);

        if self.active_voices > 0 || has_in_block_event {
            let mut frame = 0;
            while frame < frames {
                // Render up to the next event offset (or block end).
                let run_end = match self.queue.peek_offset() {
                    Some(offset) => (offset.max(0) as usize).min(frames),
                    None => frames,
                };

                for i in frame..run_end {
                    if let Some(lfo) = self.lfo.tick(self.coeffs.lfo_inc) {
                        self.modulation = lfo * (self.mod_wheel + self.coeffs.vibrato);
                    }

                    let mut o = 0.0;
                    for voice in &mut self.voices {
                        o += voice.tick(self.modulation, &self.coeffs);
                    }
                    o = output.process(o);
                    left[i] = o;
                    right[i] = o;
                }
                frame = run_end;

                if frame < frames {
                    if let Some(event) = self.queue.pop() {
                        self.note_event(event.note, event.velocity);
                    }
                }
            }

            // Block-boundary bookkeeping: hard-zero anything that decayed
            // under the silence threshold and refresh the active count.
            self.active_voices = NUM_VOICES;
            for voice in &mut self.voices {
                if !voice.settle() {
                    self.active_voices -= 1;
                }
            }
        } else {
            left.fill(0.0);
            right.fill(0.0);
        }

        #[cfg(feature = "rtrb")]
        if let Some(tap) = &mut self.tap {
            for &sample in left.iter() {
                // Full ring buffer: the visualizer is behind, drop samples.
                let _ = tap.push(sample);
            }
        }
    }

    /// Apply one message: controllers take effect immediately, note events
    /// are queued for their sample offset.
    fn dispatch(&mut self, message: &TimedMessage) {
        match message.message {
            MidiMessage::NoteOn { note, velocity } => {
                // Velocity 0 is a note-off; the distinction is resolved when
                // the event fires, so both travel the same queue.
                self.queue.push(message.offset, note as i32, velocity as i32);
            }
            MidiMessage::NoteOff { note } => {
                self.queue.push(message.offset, note as i32, 0);
            }
            MidiMessage::ControlChange { controller, value } => match controller {
                0x01 => self.mod_wheel = 0.000_000_05 * (value as f32 * value as f32),
                0x07 => self.volume = 0.000_000_35 * (value as f32 * value as f32),
                0x40 => {
                    self.sustain = value & 0x40 != 0;
                    if !self.sustain {
                        self.queue.push_sustain_release(message.offset);
                    }
                }
                // Channel-mode range (all sound off, all notes off, ...):
                // force every voice into a fast decay and drop the pedal.
                c if c > 0x7a => {
                    for voice in &mut self.voices {
                        voice.fast_release();
                    }
                    self.sustain = false;
                }
                _ => {}
            },
            MidiMessage::PitchBend { lsb, msb } => {
                let raw = (lsb as i32 + 128 * msb as i32 - 8192) as f32;
                self.pitch_bend = if raw > 0.0 {
                    1.0 + 0.000_014_951 * raw
                } else {
                    1.0 + 0.000_013_318 * raw
                };
            }
            MidiMessage::ProgramChange { program } => {
                if let Some(p) = presets::program(program as usize) {
                    self.params.set_tone(&p.values);
                    self.program_change = Some(program);
                }
            }
        }
    }

    /// Fire a queued note event. Velocity > 0 allocates a voice (stealing
    /// the quietest slot); velocity 0 releases every voice holding the note.
    /// The pedal-up marker releases sustained voices through the same path,
    /// since they are re-tagged with the marker note number.
    fn note_event(&mut self, note: i32, velocity: i32) {
        if velocity > 0 {
            let slot = self.quietest_slot();
            self.voices[slot].trigger(note, velocity, &self.coeffs, self.pitch_bend, self.volume);
        } else {
            for voice in &mut self.voices {
                if voice.note() == note {
                    if self.sustain {
                        voice.mark_sustained();
                    } else {
                        voice.begin_release(&self.coeffs);
                    }
                }
            }
        }
    }

    /// Quietest-wins allocation: smallest envelope, first scan order
    /// breaking ties. A free voice has env 0 and always wins over a
    /// sounding one.
    fn quietest_slot(&self) -> usize {
        let mut slot = 0;
        let mut quietest = 1.0;
        for (i, voice) in self.voices.iter().enumerate() {
            if voice.env() < quietest {
                quietest = voice.env();
                slot = i;
            }
        }
        slot
    }
}
