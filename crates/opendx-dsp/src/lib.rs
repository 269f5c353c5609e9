//! openDX DSP library — two-operator FM synthesis engine.
//!
//! Pure DSP math with no audio framework dependencies. The [`engine::FmEngine`]
//! renders stereo blocks from offset-tagged MIDI-style messages; everything it
//! needs (voice pool, coefficient mapping, event queue, output shaping) lives
//! in the sibling modules.

pub mod engine;
pub mod events;
pub mod lfo;
pub mod output;
pub mod params;
pub mod presets;
pub mod voice;

/// Fixed voice pool size.
pub const NUM_VOICES: usize = 8;

/// Envelope values at or below this are inaudible. Voices under the threshold
/// are skipped in the sample loop and hard-zeroed at block boundaries, which
/// also keeps denormals out of the recurrences.
pub const SILENCE: f32 = 0.0003;
