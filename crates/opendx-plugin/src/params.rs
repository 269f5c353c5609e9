use nih_plug::prelude::*;
use opendx_dsp::params::Params as EngineParams;
use opendx_dsp::presets::{DEFAULT_PROGRAM, PROGRAMS};

/// All parameters are normalized 0..1; the engine's coefficient mapper owns
/// the musical scaling. Defaults are the "Log Drum" factory program with the
/// output section at unity.
#[derive(Params)]
pub struct OpenDxParams {
    #[id = "attack"]
    pub attack: FloatParam,
    #[id = "decay"]
    pub decay: FloatParam,
    #[id = "release"]
    pub release: FloatParam,
    #[id = "coarse"]
    pub coarse: FloatParam,
    #[id = "fine"]
    pub fine: FloatParam,
    #[id = "mod_init"]
    pub mod_init: FloatParam,
    #[id = "mod_dec"]
    pub mod_dec: FloatParam,
    #[id = "mod_sus"]
    pub mod_sus: FloatParam,
    #[id = "mod_rel"]
    pub mod_rel: FloatParam,
    #[id = "mod_vel"]
    pub mod_vel: FloatParam,
    #[id = "vibrato"]
    pub vibrato: FloatParam,
    #[id = "octave"]
    pub octave: FloatParam,
    #[id = "fine_tune"]
    pub fine_tune: FloatParam,
    #[id = "waveform"]
    pub waveform: FloatParam,
    #[id = "mod_thru"]
    pub mod_thru: FloatParam,
    #[id = "lfo_rate"]
    pub lfo_rate: FloatParam,

    /// Output gain, -12 dB at 0 to +12 dB at 1.
    #[id = "gain"]
    pub gain: FloatParam,
    /// Output soft-clip amount.
    #[id = "saturation"]
    pub saturation: FloatParam,
}

fn normalized(name: &'static str, default: f32) -> FloatParam {
    FloatParam::new(name, default, FloatRange::Linear { min: 0.0, max: 1.0 })
        .with_unit(" %")
        .with_value_to_string(formatters::v2s_f32_percentage(0))
        .with_string_to_value(formatters::s2v_f32_percentage())
}

impl Default for OpenDxParams {
    fn default() -> Self {
        let tone = PROGRAMS[DEFAULT_PROGRAM].values;
        Self {
            attack: normalized("Attack", tone[0]),
            decay: normalized("Decay", tone[1]),
            release: normalized("Release", tone[2]),
            coarse: normalized("Coarse", tone[3]),
            fine: normalized("Fine", tone[4]),
            mod_init: normalized("Mod Init", tone[5]),
            mod_dec: normalized("Mod Dec", tone[6]),
            mod_sus: normalized("Mod Sus", tone[7]),
            mod_rel: normalized("Mod Rel", tone[8]),
            mod_vel: normalized("Mod Vel", tone[9]),
            vibrato: normalized("Vibrato", tone[10]),
            octave: normalized("Octave", tone[11]),
            fine_tune: normalized("Fine Tune", tone[12]),
            waveform: normalized("Waveform", tone[13]),
            mod_thru: normalized("Mod Thru", tone[14]),
            lfo_rate: normalized("LFO Rate", tone[15]),

            gain: FloatParam::new("Gain", 0.5, FloatRange::Linear { min: 0.0, max: 1.0 })
                .with_smoother(SmoothingStyle::Linear(20.0))
                .with_unit(" dB")
                .with_value_to_string(std::sync::Arc::new(|v| format!("{:.1}", v * 24.0 - 12.0)))
                .with_string_to_value(std::sync::Arc::new(|s| {
                    s.trim().trim_end_matches("dB").trim().parse::<f32>().ok().map(|db| (db + 12.0) / 24.0)
                })),
            saturation: FloatParam::new("Saturation", 0.0, FloatRange::Linear { min: 0.0, max: 1.0 })
                .with_smoother(SmoothingStyle::Linear(20.0))
                .with_unit(" %")
                .with_value_to_string(formatters::v2s_f32_percentage(0))
                .with_string_to_value(formatters::s2v_f32_percentage()),
        }
    }
}

impl OpenDxParams {
    /// Snapshot the current values into the engine's parameter struct.
    /// Called once per block; gain and saturation advance their smoothers
    /// one step per block (coefficients are per-block anyway).
    pub fn snapshot(&self) -> EngineParams {
        EngineParams {
            attack: self.attack.value(),
            decay: self.decay.value(),
            release: self.release.value(),
            coarse: self.coarse.value(),
            fine: self.fine.value(),
            mod_init: self.mod_init.value(),
            mod_dec: self.mod_dec.value(),
            mod_sus: self.mod_sus.value(),
            mod_rel: self.mod_rel.value(),
            mod_vel: self.mod_vel.value(),
            vibrato: self.vibrato.value(),
            octave: self.octave.value(),
            fine_tune: self.fine_tune.value(),
            waveform: self.waveform.value(),
            mod_thru: self.mod_thru.value(),
            lfo_rate: self.lfo_rate.value(),
            gain: self.gain.smoothed.next(),
            saturation: self.saturation.smoothed.next(),
        }
    }
}
