/// Parameter mapping — normalized controls to per-sample-rate coefficients.
///
/// The host hands the engine a snapshot of normalized (0..1) knob values.
/// Once per block, `Coefficients::derive` converts the snapshot into the
/// rates and increments the sample loop actually consumes. The mappings are
/// mostly exponential: a knob sweep covers several orders of magnitude of
/// envelope time, which is how the original hardware-style controls feel.

use crate::presets::Program;

/// Normalized parameter snapshot: sixteen tone controls plus the output
/// section. All values 0..1; the engine assumes the host has clamped them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Carrier envelope attack time (0 = instant, 1 = slow).
    pub attack: f32,
    /// Carrier envelope decay time. Above 0.98 the envelope holds forever.
    pub decay: f32,
    /// Carrier envelope release time after note-off.
    pub release: f32,
    /// Coarse modulator:carrier frequency ratio.
    pub coarse: f32,
    /// Fine ratio offset; the upper half snaps to musical fractions.
    pub fine: f32,
    /// Modulator envelope initial level.
    pub mod_init: f32,
    /// Modulator envelope decay rate.
    pub mod_dec: f32,
    /// Modulator envelope sustain level.
    pub mod_sus: f32,
    /// Modulator envelope release rate after note-off.
    pub mod_rel: f32,
    /// Velocity sensitivity of the modulator depth.
    pub mod_vel: f32,
    /// Vibrato depth (LFO to carrier pitch).
    pub vibrato: f32,
    /// Octave transpose, quantized to 7 octaves.
    pub octave: f32,
    /// Fine tune, +-1 semitone across the range.
    pub fine_tune: f32,
    /// Waveform richness: cubic waveshaping amount on the carrier.
    pub waveform: f32,
    /// Modulator-through mix: raw modulator added to the output.
    pub mod_thru: f32,
    /// LFO rate, 0..25 Hz square-law.
    pub lfo_rate: f32,
    /// Output gain, -12 dB..+12 dB.
    pub gain: f32,
    /// Output saturation amount (0 = clean pass-through).
    pub saturation: f32,
}

impl Params {
    /// Snapshot for a factory program, output section at its power-on state
    /// (unity-centered gain, no saturation).
    pub fn from_program(program: &Program) -> Self {
        let mut params = Self {
            attack: 0.0,
            decay: 0.0,
            release: 0.0,
            coarse: 0.0,
            fine: 0.0,
            mod_init: 0.0,
            mod_dec: 0.0,
            mod_sus: 0.0,
            mod_rel: 0.0,
            mod_vel: 0.0,
            vibrato: 0.0,
            octave: 0.5,
            fine_tune: 0.5,
            waveform: 0.0,
            mod_thru: 0.0,
            lfo_rate: 0.5,
            gain: 0.5,
            saturation: 0.0,
        };
        params.set_tone(&program.values);
        params
    }

    /// Overwrite the sixteen tone controls, leaving the output section
    /// (gain, saturation) untouched. Program changes go through here so a
    /// patch switch never jumps the output level.
    pub fn set_tone(&mut self, values: &[f32; 16]) {
        self.attack = values[0];
        self.decay = values[1];
        self.release = values[2];
        self.coarse = values[3];
        self.fine = values[4];
        self.mod_init = values[5];
        self.mod_dec = values[6];
        self.mod_sus = values[7];
        self.mod_rel = values[8];
        self.mod_vel = values[9];
        self.vibrato = values[10];
        self.octave = values[11];
        self.fine_tune = values[12];
        self.waveform = values[13];
        self.mod_thru = values[14];
        self.lfo_rate = values[15];
    }
}

impl Default for Params {
    /// Power-on state: factory program 15 ("Log Drum").
    fn default() -> Self {
        Self::from_program(&crate::presets::PROGRAMS[15])
    }
}

/// Derived per-block coefficient set. Everything here is a pure function of
/// a `Params` snapshot and the sample rate; the engine recomputes it at
/// block entry and holds it constant across the block.
#[derive(Debug, Clone, Copy)]
pub struct Coefficients {
    /// Carrier phase increment for MIDI note 0 (8.1758 Hz) at the current
    /// octave setting, per sample.
    pub tune: f32,
    /// Fine tune in fractional semitones, -1..+1.
    pub fine_tune: f32,
    /// Modulator:carrier frequency ratio, scaled into resonator phase units.
    pub ratio: f32,
    /// Carrier envelope attack approach rate (one-pole coefficient).
    pub attack: f32,
    /// Carrier envelope per-sample decay multiplier.
    pub decay: f32,
    /// Carrier envelope per-sample release multiplier.
    pub release: f32,
    /// Modulator envelope initial level scale.
    pub mod_init: f32,
    /// Modulator envelope approach rate while the note is held.
    pub mod_decay: f32,
    /// Modulator envelope sustain level scale.
    pub mod_sustain: f32,
    /// Modulator envelope approach rate after release.
    pub mod_release: f32,
    /// Cubic waveshaping coefficient; 0.5 at waveform 0, negative when hot.
    pub richness: f32,
    /// Raw waveform control; note-on amplitude scales by (1.5 - waveform).
    pub waveform: f32,
    /// Raw modulator mixed into the voice output.
    pub mod_mix: f32,
    /// Vibrato depth applied to the LFO output.
    pub vibrato: f32,
    /// LFO resonator increment per update.
    pub lfo_inc: f32,
    /// Modulator velocity sensitivity, 0..1.
    pub velocity_sens: f32,
    /// Linear output gain, mapped from -12..+12 dB.
    pub output_gain: f32,
    /// Saturation amount handed to the output stage.
    pub saturation: f32,
}

impl Coefficients {
    /// Map a parameter snapshot at the given sample rate.
    ///
    /// All exponentials are bounded by construction for in-range inputs:
    /// the inner `exp` arguments stay within about +-8 and the outer ones
    /// are scaled by 1/sample_rate, so every output is finite.
    pub fn derive(params: &Params, sample_rate: f32) -> Self {
        let isr = 1.0 / sample_rate;

        // MIDI note 0 frequency, transposed by whole octaves. The 6.9
        // multiplier quantizes the knob to 7 positions without a reachable
        // edge case at exactly 1.0.
        let tune = 8.175_798_915_644 * isr * f32::powf(2.0, (params.octave * 6.9).floor() - 2.0);
        let fine_tune = params.fine_tune + params.fine_tune - 1.0;

        let coarse = (40.1 * params.coarse * params.coarse).floor();
        let fine = if params.fine < 0.5 {
            0.2 * params.fine * params.fine
        } else {
            // Upper half of the knob snaps to musically useful fractions.
            match (8.9 * params.fine) as i32 {
                4 => 0.25,
                5 => 0.333_333_33,
                6 => 0.50,
                7 => 0.666_666_7,
                _ => 0.75,
            }
        };
        let ratio = 1.570_796_326_795 * (coarse + fine);

        let attack = 1.0 - f32::exp(-isr * f32::exp(8.0 - 8.0 * params.attack));
        let decay = if params.decay > 0.98 {
            // Top of the knob: infinite sustain.
            1.0
        } else {
            f32::exp(-isr * f32::exp(5.0 - 8.0 * params.decay))
        };
        let release = f32::exp(-isr * f32::exp(5.0 - 5.0 * params.release));

        let mod_init = 0.0002 * params.mod_init * params.mod_init;
        let mod_decay = 1.0 - f32::exp(-isr * f32::exp(6.0 - 7.0 * params.mod_dec));
        let mod_sustain = 0.0002 * params.mod_sus * params.mod_sus;
        let mod_release = 1.0 - f32::exp(-isr * f32::exp(5.0 - 8.0 * params.mod_rel));

        let richness = 0.50 - 3.0 * params.waveform * params.waveform;
        let mod_mix = 0.25 * params.mod_thru * params.mod_thru;
        let vibrato = 0.001 * params.vibrato * params.vibrato;
        // 628.3 = 100 * 2*pi: the LFO is only stepped every 100 samples.
        let lfo_inc = 628.3 * isr * 25.0 * params.lfo_rate * params.lfo_rate;

        let output_gain = f32::powf(10.0, (params.gain * 24.0 - 12.0) / 20.0);

        Self {
            tune,
            fine_tune,
            ratio,
            attack,
            decay,
            release,
            mod_init,
            mod_decay,
            mod_sustain,
            mod_release,
            richness,
            waveform: params.waveform,
            mod_mix,
            vibrato,
            lfo_inc,
            velocity_sens: params.mod_vel,
            output_gain,
            saturation: params.saturation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    fn all_fields(c: &Coefficients) -> [f32; 18] {
        [
            c.tune,
            c.fine_tune,
            c.ratio,
            c.attack,
            c.decay,
            c.release,
            c.mod_init,
            c.mod_decay,
            c.mod_sustain,
            c.mod_release,
            c.richness,
            c.waveform,
            c.mod_mix,
            c.vibrato,
            c.lfo_inc,
            c.velocity_sens,
            c.output_gain,
            c.saturation,
        ]
    }

    #[test]
    fn test_all_coefficients_finite_over_grid() {
        // Sweep every control through 0, 1 and a handful of interior points.
        let points = [0.0, 0.1, 0.25, 0.5, 0.75, 0.98, 0.99, 1.0];
        let mut params = Params::default();
        for &v in &points {
            params.attack = v;
            params.decay = v;
            params.release = v;
            params.coarse = v;
            params.fine = v;
            params.mod_init = v;
            params.mod_dec = v;
            params.mod_sus = v;
            params.mod_rel = v;
            params.mod_vel = v;
            params.vibrato = v;
            params.octave = v;
            params.fine_tune = v;
            params.waveform = v;
            params.mod_thru = v;
            params.lfo_rate = v;
            params.gain = v;
            params.saturation = v;
            let c = Coefficients::derive(&params, SR);
            for (i, f) in all_fields(&c).iter().enumerate() {
                assert!(f.is_finite(), "field {i} not finite at control value {v}");
            }
        }
    }

    #[test]
    fn test_octave_steps_double_tune() {
        let mut params = Params::default();
        params.octave = 0.0;
        let lo = Coefficients::derive(&params, SR).tune;
        params.octave = 1.0 / 6.9 + 0.01; // one quantized step up
        let hi = Coefficients::derive(&params, SR).tune;
        assert!((hi / lo - 2.0).abs() < 1e-4, "octave step should double tune: {lo} -> {hi}");
    }

    #[test]
    fn test_fine_ratio_snap_points() {
        let mut params = Params::default();
        let cases = [(0.50, 0.25), (0.58, 0.333_333_33), (0.70, 0.50), (0.80, 0.666_666_7), (0.95, 0.75)];
        params.coarse = 0.0; // coarse' = 0 so ratio is fine' alone
        for (knob, expect) in cases {
            params.fine = knob;
            let c = Coefficients::derive(&params, SR);
            let fine = c.ratio / 1.570_796_326_795;
            assert!(
                (fine - expect).abs() < 1e-6,
                "fine {knob} should snap to {expect}, got {fine}"
            );
        }
    }

    #[test]
    fn test_decay_holds_at_top_of_knob() {
        let mut params = Params::default();
        params.decay = 0.99;
        assert_eq!(Coefficients::derive(&params, SR).decay, 1.0);
        params.decay = 0.5;
        let d = Coefficients::derive(&params, SR).decay;
        assert!(d < 1.0 && d > 0.99, "mid-knob decay should be a slow multiplier, got {d}");
    }

    #[test]
    fn test_gain_mapping_endpoints() {
        let mut params = Params::default();
        params.gain = 0.5;
        let unity = Coefficients::derive(&params, SR).output_gain;
        assert!((unity - 1.0).abs() < 1e-6);
        params.gain = 1.0;
        let max = Coefficients::derive(&params, SR).output_gain;
        assert!((20.0 * max.log10() - 12.0).abs() < 0.01, "full gain should be +12 dB");
        params.gain = 0.0;
        let min = Coefficients::derive(&params, SR).output_gain;
        assert!((20.0 * min.log10() + 12.0).abs() < 0.01, "zero gain should be -12 dB");
    }

    #[test]
    fn test_attack_rate_orders() {
        // Attack 0 is near-instant (large approach coefficient), attack 1 slow.
        let mut params = Params::default();
        params.attack = 0.0;
        let fast = Coefficients::derive(&params, SR).attack;
        params.attack = 1.0;
        let slow = Coefficients::derive(&params, SR).attack;
        assert!(fast > slow * 100.0, "attack 0 ({fast}) should be far faster than attack 1 ({slow})");
    }

    #[test]
    fn test_program_change_preserves_output_section() {
        let mut params = Params::default();
        params.gain = 0.9;
        params.saturation = 0.4;
        params.set_tone(&crate::presets::PROGRAMS[0].values);
        assert_eq!(params.gain, 0.9);
        assert_eq!(params.saturation, 0.4);
        assert_eq!(params.decay, crate::presets::PROGRAMS[0].values[1]);
    }
}
