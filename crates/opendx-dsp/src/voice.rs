/// Single FM voice — carrier + modulator recurrences and their envelopes.
///
/// A voice is a plain record of oscillator and envelope state; the engine
/// owns a fixed array of them and calls `tick` once per sample. There is no
/// phase accumulator in radians anywhere: the modulator is a two-tap
/// resonator (`y[n] = dmod*y[n-1] - y[n-2]` with `dmod = 2*cos(theta)`) and
/// the carrier phase lives in the normalized range [-1, 1].

use crate::SILENCE;
use crate::params::Coefficients;

/// `note` value marking a voice whose note-off arrived while the sustain
/// pedal was down. Outside the 0..=127 MIDI range, so pedal-up can release
/// every such voice by matching this as an ordinary note number.
pub const SUSTAINED_NOTE: i32 = 128;

#[derive(Debug, Clone, Copy)]
pub struct Voice {
    note: i32,
    /// Carrier amplitude envelope; decays multiplicatively by `cdec`.
    env: f32,
    /// Smoothed envelope chasing `env` at rate `catt`; scales the output.
    cenv: f32,
    /// Attack approach rate in force for this voice.
    catt: f32,
    /// Decay (or release) multiplier in force for this voice.
    cdec: f32,
    /// Carrier phase in [-1, 1] and per-sample increment.
    car: f32,
    dcar: f32,
    /// Modulator resonator taps and feedback coefficient (2*cos of the
    /// modulator phase increment).
    mod0: f32,
    mod1: f32,
    dmod: f32,
    /// Modulator envelope: current value, approach target, approach rate.
    menv: f32,
    mlev: f32,
    mdec: f32,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            note: 0,
            env: 0.0,
            cenv: 0.0,
            catt: 0.0,
            cdec: 0.99,
            car: 0.0,
            dcar: 0.0,
            mod0: 0.0,
            mod1: 0.0,
            dmod: 0.0,
            menv: 0.0,
            mlev: 0.0,
            mdec: 0.0,
        }
    }

    /// Start a note on this slot, overwriting whatever was here.
    ///
    /// `pitch_bend` and `volume` are the controller values current at the
    /// event; the per-voice rates are captured from `coeffs` now, so voices
    /// triggered under different settings keep their own envelopes.
    pub fn trigger(
        &mut self,
        note: i32,
        velocity: i32,
        coeffs: &Coefficients,
        pitch_bend: f32,
        volume: f32,
    ) {
        // Equal-tempered frequency for the note, as a multiple of the
        // note-0 tune (0.05776 = ln(2)/12).
        let pitch = f32::exp(0.057_762_265_05 * (note as f32 + coeffs.fine_tune));

        self.note = note;
        self.car = 0.0;
        self.dcar = coeffs.tune * pitch_bend * pitch;

        // Velocity scaling of the modulator depth reuses the pitch value,
        // clamped so extreme treble notes don't over-modulate.
        let p = pitch.min(50.0) * (64.0 + coeffs.velocity_sens * (velocity as f32 - 64.0));
        self.menv = coeffs.mod_init * p;
        self.mlev = coeffs.mod_sustain * p;
        self.mdec = coeffs.mod_decay;

        // Convert the modulator phase increment to resonator form. Seeding
        // mod1 with sin(theta) makes the recurrence emit a unit sinusoid.
        let theta = coeffs.ratio * self.dcar;
        self.mod0 = 0.0;
        self.mod1 = theta.sin();
        self.dmod = 2.0 * theta.cos();

        self.env = (1.5 - coeffs.waveform) * volume * (velocity as f32 + 10.0);
        self.cdec = coeffs.decay;
        self.catt = coeffs.attack;
        self.cenv = 0.0;
    }

    /// Enter the release phase: the envelope continues from its current
    /// smoothed level and decays at the release rate, and the modulator
    /// envelope falls toward zero.
    pub fn begin_release(&mut self, coeffs: &Coefficients) {
        self.cdec = coeffs.release;
        self.env = self.cenv;
        self.catt = 1.0;
        self.mlev = 0.0;
        self.mdec = coeffs.mod_release;
    }

    /// Defer release until pedal-up by re-tagging the note.
    pub fn mark_sustained(&mut self) {
        self.note = SUSTAINED_NOTE;
    }

    /// Panic path (MIDI channel-mode messages): force a fast decay.
    pub fn fast_release(&mut self) {
        self.cdec = 0.99;
    }

    /// Advance one sample and return this voice's output contribution.
    /// Inaudible voices are skipped entirely; their oscillator state is
    /// frozen until the slot is re-triggered.
    #[inline]
    pub fn tick(&mut self, modulation: f32, coeffs: &Coefficients) -> f32 {
        if self.env <= SILENCE {
            return 0.0;
        }

        self.env *= self.cdec;
        self.cenv += self.catt * (self.env - self.cenv);

        // Modulator oscillator step.
        let y = self.dmod * self.mod0 - self.mod1;
        self.mod1 = self.mod0;
        self.mod0 = y;

        // Modulator envelope one-pole approach.
        self.menv += self.mdec * (self.mlev - self.menv);

        // Carrier phase step, wrapped back into [-1, 1]. The wrap is a +-2
        // correction, not a modulo: FM pushes the phase at most a little
        // past the boundary each sample.
        let mut x = self.car + self.dcar + y * self.menv + modulation;
        while x > 1.0 {
            x -= 2.0;
        }
        while x < -1.0 {
            x += 2.0;
        }
        self.car = x;

        // Cubic waveshape; richness steers the harmonic content.
        let s = x + x * x * x * (coeffs.richness * x * x - 1.0 - coeffs.richness);

        self.cenv * (coeffs.mod_mix * self.mod1 + s)
    }

    /// Block-boundary bookkeeping. Hard-zeroes a sub-threshold envelope
    /// (stopping asymptotic decay before it reaches denormal range) and
    /// returns whether the voice is still sounding. A silent modulator
    /// envelope is zeroed too, but the oscillator keeps its phase so a
    /// re-trigger never clicks.
    pub fn settle(&mut self) -> bool {
        if self.menv < SILENCE {
            self.menv = 0.0;
            self.mlev = 0.0;
        }
        if self.env < SILENCE {
            self.env = 0.0;
            self.cenv = 0.0;
            false
        } else {
            true
        }
    }

    pub fn note(&self) -> i32 {
        self.note
    }

    pub fn env(&self) -> f32 {
        self.env
    }

    /// Reset to the power-on state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[cfg(test)]
    pub(crate) fn carrier_phase(&self) -> f32 {
        self.car
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}
