/// Output stage — tanh soft-clip followed by linear gain.
///
/// The knee sharpens with the saturation control: the signal is driven
/// harder into the tanh while the make-up division only compensates half
/// of the drive, so higher settings are both more compressed and slightly
/// louder into the curve. At saturation 0 the stage is a pure gain.

#[derive(Debug, Clone, Copy)]
pub struct OutputStage {
    saturation: f32,
    gain: f32,
}

impl OutputStage {
    pub fn new(saturation: f32, gain: f32) -> Self {
        Self { saturation, gain }
    }

    #[inline]
    pub fn process(&self, sample: f32) -> f32 {
        let mut o = sample;
        if self.saturation > 0.0 {
            let drive = self.saturation * 4.0;
            o = (o * (1.0 + drive)).tanh() / (1.0 + drive * 0.5);
        }
        o * self.gain
    }

    /// Largest magnitude this stage can emit: tanh saturates to 1, scaled
    /// by the knee make-up and the gain. With saturation 0 the output is
    /// unbounded in principle (gain only), so callers get `None`.
    pub fn bound(&self) -> Option<f32> {
        (self.saturation > 0.0).then(|| {
            let drive = self.saturation * 4.0;
            self.gain / (1.0 + drive * 0.5)
        })
    }
}
