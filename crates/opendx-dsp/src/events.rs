/// MIDI-style message model and the in-block note event queue.
///
/// Hosts feed the engine offset-tagged [`TimedMessage`]s. Controller and
/// pitch-bend messages mutate engine state immediately when the block
/// starts; note events (and the synthetic pedal-up release marker) are
/// queued with their sample offsets and consumed in order while the block
/// renders, giving sample-accurate note timing.
///
/// `MidiMessage::parse` decodes raw 3-byte channel-voice messages for hosts
/// that speak wire-format MIDI; plugin hosts construct the enum directly.

use crate::voice::SUSTAINED_NOTE;

/// Triples the queue can hold per block. Excess events in a single block
/// are absorbed by overwriting the last slot rather than overflowing.
pub const EVENT_CAPACITY: usize = 40;

/// A channel-voice message the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    ControlChange { controller: u8, value: u8 },
    /// Raw 14-bit pitch bend, as wire bytes (lsb + 128*msb, center 8192).
    PitchBend { lsb: u8, msb: u8 },
    ProgramChange { program: u8 },
}

impl MidiMessage {
    /// Decode a raw channel-voice message. Returns `None` for anything the
    /// engine does not react to (aftertouch, system messages, truncated
    /// data); callers drop those silently.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        match status & 0xf0 {
            0x80 => Some(Self::NoteOff { note: *data.first()? & 0x7f }),
            0x90 => Some(Self::NoteOn {
                note: *data.first()? & 0x7f,
                velocity: *data.get(1)? & 0x7f,
            }),
            0xb0 => Some(Self::ControlChange {
                controller: *data.first()?,
                value: *data.get(1)?,
            }),
            0xc0 => Some(Self::ProgramChange { program: *data.first()? }),
            0xe0 => Some(Self::PitchBend {
                lsb: *data.first()?,
                msb: *data.get(1)?,
            }),
            _ => None,
        }
    }
}

/// A message tagged with its sample offset inside the current block.
#[derive(Debug, Clone, Copy)]
pub struct TimedMessage {
    pub offset: u32,
    pub message: MidiMessage,
}

impl TimedMessage {
    pub fn new(offset: u32, message: MidiMessage) -> Self {
        Self { offset, message }
    }
}

/// One queued note event: sample offset, note number (or [`SUSTAINED_NOTE`]
/// for the pedal-up release-all marker), velocity (0 = note-off).
#[derive(Debug, Clone, Copy)]
pub(crate) struct NoteEvent {
    pub offset: i32,
    pub note: i32,
    pub velocity: i32,
}

/// Fixed-capacity queue, rebuilt every block and drained in order. Never
/// allocates; lives for exactly one block call.
pub(crate) struct EventQueue {
    events: [NoteEvent; EVENT_CAPACITY],
    len: usize,
    cursor: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: [NoteEvent { offset: 0, note: 0, velocity: 0 }; EVENT_CAPACITY],
            len: 0,
            cursor: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
    }

    /// Append a note event. When the queue is full the last slot is
    /// overwritten: the write cursor backs off instead of running past the
    /// buffer, so a hostile event flood degrades instead of corrupting.
    pub fn push(&mut self, offset: u32, note: i32, velocity: i32) {
        let event = NoteEvent { offset: offset as i32, note, velocity };
        if self.len == EVENT_CAPACITY {
            self.events[EVENT_CAPACITY - 1] = event;
        } else {
            self.events[self.len] = event;
            self.len += 1;
        }
    }

    /// Queue the synthetic "release everything the pedal was holding"
    /// event emitted when the sustain pedal comes up.
    pub fn push_sustain_release(&mut self, offset: u32) {
        self.push(offset, SUSTAINED_NOTE, 0);
    }

    /// Sample offset of the next unconsumed event, if any.
    pub fn peek_offset(&self) -> Option<i32> {
        (self.cursor < self.len).then(|| self.events[self.cursor].offset)
    }

    pub fn pop(&mut self) -> Option<NoteEvent> {
        let event = (self.cursor < self.len).then(|| self.events[self.cursor])?;
        self.cursor += 1;
        Some(event)
    }

    pub fn is_empty(&self) -> bool {
        self.cursor >= self.len
    }
}
