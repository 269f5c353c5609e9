/// Decimated vibrato LFO — two-tap resonator stepped every 100 samples.
///
/// The oscillator is the magic-circle recurrence
///
///   lfo0 += inc * lfo1
///   lfo1 -= inc * lfo0
///
/// which rotates the (lfo0, lfo1) pair around the unit circle without any
/// per-update trig. It is only advanced every `LFO_DECIMATION` samples; the
/// derived increment already folds the factor 100 in, so the audible rate is
/// unchanged. The staircase this puts on the vibrato is part of the sound.

/// Samples between LFO updates.
pub const LFO_DECIMATION: i32 = 100;

#[derive(Debug, Clone)]
pub struct BlockLfo {
    lfo0: f32,
    lfo1: f32,
    step: i32,
}

impl BlockLfo {
    pub fn new() -> Self {
        Self { lfo0: 0.0, lfo1: 1.0, step: 0 }
    }

    /// Advance one sample. Returns the fresh oscillator value on update
    /// samples, `None` on the samples in between (caller holds the last
    /// modulation value).
    pub fn tick(&mut self, inc: f32) -> Option<f32> {
        self.step -= 1;
        if self.step < 0 {
            self.lfo0 += inc * self.lfo1;
            self.lfo1 -= inc * self.lfo0;
            self.step = LFO_DECIMATION;
            Some(self.lfo1)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.lfo0 = 0.0;
        self.lfo1 = 1.0;
        self.step = 0;
    }
}

impl Default for BlockLfo {
    fn default() -> Self {
        Self::new()
    }
}
